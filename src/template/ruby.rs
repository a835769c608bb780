//! Ruby templates. Trees only.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("int", "Integer"),
    ("double", "Float"),
    ("indent", "    "),
    ("in_brackets", "[{{value}}]"),
    ("arr[]", "{{name}} = {{values}}"),
    ("arr[][]", "{{name}} = {{values}}"),
    ("if", "if {{features}}[{{index}}] {{op}} {{threshold}}"),
    ("else", "else"),
    ("endif", "end"),
    ("assign", "{{classes}}[{{index}}] = {{value}}"),
    ("join", ""),
    (
        "output.predict",
        "puts JSON.generate({ 'predict' => model.predict(features) })",
    ),
    (
        "output.predict_proba",
        r##"puts JSON.generate({
        'predict' => model.predict(features),
        'predictProba' => model.predict_proba(features)
    })"##,
    ),
    (
        "tree.methods",
        r##"    def predict(features)
        classes = compute(features)
        index = 0
        (1...classes.length).each do |i|
            index = i if classes[i] > classes[index]
        end
        index
    end

    def predict_proba(features)
        classes = compute(features)
        sum = classes.sum
        classes.map { |c| sum > 0 ? c.to_f / sum : 0.0 }
    end"##,
    ),
    (
        "tree.attached",
        r##"require 'json'

class {{class_name}}

    def initialize(lefts, rights, thresholds, indices, classes)
        @lefts = lefts
        @rights = rights
        @thresholds = thresholds
        @indices = indices
        @classes = classes
    end

    def compute(features)
        node = 0
        while @thresholds[node] != -2
            child = features[@indices[node]] <= @thresholds[node] ? @lefts[node] : @rights[node]
            return Array.new(@classes[0].length, 0) if child == -1
            node = child
        end
        @classes[node]
    end

{{methods}}

end

if __FILE__ == $0
    if ARGV.length != {{n_features}}
        $stderr.puts "expected {{n_features}} features, got #{ARGV.length}"
        exit 1
    end
    features = ARGV.map(&:to_f)
    {{lefts}}
    {{rights}}
    {{thresholds}}
    {{indices}}
    {{classes}}
    model = {{class_name}}.new(lefts, rights, thresholds, indices, classes)
    {{output}}
end
"##,
    ),
    (
        "tree.combined",
        r##"require 'json'

class {{class_name}}

    def initialize(lefts, rights, thresholds, indices, classes)
        @lefts = lefts
        @rights = rights
        @thresholds = thresholds
        @indices = indices
        @classes = classes
    end

    def compute(features)
        classes = Array.new({{n_classes}}, 0)
        {{tree}}
        classes
    end

{{methods}}

end

if __FILE__ == $0
    if ARGV.length != {{n_features}}
        $stderr.puts "expected {{n_features}} features, got #{ARGV.length}"
        exit 1
    end
    features = ARGV.map(&:to_f)
    {{lefts}}
    {{rights}}
    {{thresholds}}
    {{indices}}
    {{classes}}
    model = {{class_name}}.new(lefts, rights, thresholds, indices, classes)
    {{output}}
end
"##,
    ),
    (
        "tree.exported",
        r##"require 'json'

class {{class_name}}

    def initialize(lefts, rights, thresholds, indices, classes)
        @lefts = lefts
        @rights = rights
        @thresholds = thresholds
        @indices = indices
        @classes = classes
    end

    def compute(features)
        node = 0
        while @thresholds[node] != -2
            child = features[@indices[node]] <= @thresholds[node] ? @lefts[node] : @rights[node]
            return Array.new(@classes[0].length, 0) if child == -1
            node = child
        end
        @classes[node]
    end

{{methods}}

end

if __FILE__ == $0
    if ARGV.length != {{n_features}} + 1
        $stderr.puts "expected a data file and {{n_features}} features, got #{ARGV.length} arguments"
        exit 1
    end
    data = JSON.parse(File.read(ARGV[0]))
    features = ARGV.drop(1).map(&:to_f)
    model = {{class_name}}.new(data['lefts'], data['rights'], data['thresholds'], data['indices'], data['classes'])
    {{output}}
end
"##,
    ),
];
