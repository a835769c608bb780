//! PHP templates. Trees only.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("int", "int"),
    ("double", "float"),
    ("indent", "    "),
    ("in_brackets", "[{{value}}]"),
    ("arr[]", "{{name}} = {{values}};"),
    ("arr[][]", "{{name}} = {{values}};"),
    ("if", "if ({{features}}[{{index}}] {{op}} {{threshold}}) {"),
    ("else", "} else {"),
    ("endif", "}"),
    ("assign", "{{classes}}[{{index}}] = {{value}}"),
    ("join", ";"),
    (
        "output.predict",
        r#"echo json_encode(['predict' => $model->predict($features)]), "\n";"#,
    ),
    (
        "output.predict_proba",
        r#"echo json_encode([
    'predict' => $model->predict($features),
    'predictProba' => $model->predictProba($features),
]), "\n";"#,
    ),
    (
        "tree.methods",
        r#"    public function predict($features) {
        $classes = $this->compute($features);
        $index = 0;
        for ($i = 1; $i < count($classes); $i++) {
            if ($classes[$i] > $classes[$index]) {
                $index = $i;
            }
        }
        return $index;
    }

    public function predictProba($features) {
        $classes = $this->compute($features);
        $sum = array_sum($classes);
        $probabilities = [];
        foreach ($classes as $count) {
            $probabilities[] = $sum > 0 ? $count / $sum : 0.0;
        }
        return $probabilities;
    }"#,
    ),
    (
        "tree.attached",
        r#"<?php

class {{class_name}} {

    private $lefts;
    private $rights;
    private $thresholds;
    private $indices;
    private $classes;

    public function __construct($lefts, $rights, $thresholds, $indices, $classes) {
        $this->lefts = $lefts;
        $this->rights = $rights;
        $this->thresholds = $thresholds;
        $this->indices = $indices;
        $this->classes = $classes;
    }

    private function compute($features) {
        $node = 0;
        while ($this->thresholds[$node] != -2) {
            $next = $features[$this->indices[$node]] <= $this->thresholds[$node]
                ? $this->lefts[$node]
                : $this->rights[$node];
            if ($next == -1) {
                return array_fill(0, count($this->classes[0]), 0);
            }
            $node = $next;
        }
        return $this->classes[$node];
    }

{{methods}}
}

if ($argc - 1 != {{n_features}}) {
    fwrite(STDERR, 'expected {{n_features}} features, got ' . ($argc - 1) . "\n");
    exit(1);
}
$features = array_map('floatval', array_slice($argv, 1));
{{lefts}}
{{rights}}
{{thresholds}}
{{indices}}
{{classes}}
$model = new {{class_name}}($lefts, $rights, $thresholds, $indices, $classes);
{{output}}
"#,
    ),
    (
        "tree.combined",
        r#"<?php

class {{class_name}} {

    private $lefts;
    private $rights;
    private $thresholds;
    private $indices;
    private $classes;

    public function __construct($lefts, $rights, $thresholds, $indices, $classes) {
        $this->lefts = $lefts;
        $this->rights = $rights;
        $this->thresholds = $thresholds;
        $this->indices = $indices;
        $this->classes = $classes;
    }

    private function compute($features) {
        $classes = array_fill(0, {{n_classes}}, 0);
        {{tree}}
        return $classes;
    }

{{methods}}
}

if ($argc - 1 != {{n_features}}) {
    fwrite(STDERR, 'expected {{n_features}} features, got ' . ($argc - 1) . "\n");
    exit(1);
}
$features = array_map('floatval', array_slice($argv, 1));
{{lefts}}
{{rights}}
{{thresholds}}
{{indices}}
{{classes}}
$model = new {{class_name}}($lefts, $rights, $thresholds, $indices, $classes);
{{output}}
"#,
    ),
    (
        "tree.exported",
        r#"<?php

class {{class_name}} {

    private $lefts;
    private $rights;
    private $thresholds;
    private $indices;
    private $classes;

    public function __construct($lefts, $rights, $thresholds, $indices, $classes) {
        $this->lefts = $lefts;
        $this->rights = $rights;
        $this->thresholds = $thresholds;
        $this->indices = $indices;
        $this->classes = $classes;
    }

    private function compute($features) {
        $node = 0;
        while ($this->thresholds[$node] != -2) {
            $next = $features[$this->indices[$node]] <= $this->thresholds[$node]
                ? $this->lefts[$node]
                : $this->rights[$node];
            if ($next == -1) {
                return array_fill(0, count($this->classes[0]), 0);
            }
            $node = $next;
        }
        return $this->classes[$node];
    }

{{methods}}
}

if ($argc - 2 != {{n_features}}) {
    fwrite(STDERR, 'expected a data file and {{n_features}} features, got ' . ($argc - 1) . " arguments\n");
    exit(1);
}
$data = json_decode(file_get_contents($argv[1]), true);
$features = array_map('floatval', array_slice($argv, 2));
$model = new {{class_name}}($data['lefts'], $data['rights'], $data['thresholds'], $data['indices'], $data['classes']);
{{output}}
"#,
    ),
];
