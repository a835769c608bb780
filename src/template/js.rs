//! JavaScript (Node.js) templates. Trees, MLP classifiers and regressors.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("int", "number"),
    ("double", "number"),
    ("indent", "    "),
    ("in_brackets", "[{{value}}]"),
    ("arr[]", "const {{name}} = {{values}};"),
    ("arr[][]", "const {{name}} = {{values}};"),
    ("arr[][][]", "const {{name}} = {{values}};"),
    ("if", "if ({{features}}[{{index}}] {{op}} {{threshold}}) {"),
    ("else", "} else {"),
    ("endif", "}"),
    ("assign", "{{classes}}[{{index}}] = {{value}}"),
    ("join", ";"),
    (
        "output.predict",
        "console.log(JSON.stringify({ predict: model.predict(features) }));",
    ),
    (
        "output.predict_proba",
        r#"console.log(JSON.stringify({
        predict: model.predict(features),
        predictProba: model.predictProba(features),
    }));"#,
    ),
    // ─── Decision tree ─────────────────────────────────────────────
    (
        "tree.methods",
        r#"    predict(features) {
        const classes = this.compute(features);
        let index = 0;
        for (let i = 1; i < classes.length; i++) {
            if (classes[i] > classes[index]) {
                index = i;
            }
        }
        return index;
    }

    predictProba(features) {
        const classes = this.compute(features);
        const sum = classes.reduce((a, b) => a + b, 0);
        return classes.map((c) => (sum > 0 ? c / sum : 0));
    }"#,
    ),
    (
        "tree.attached",
        r#"class {{class_name}} {

    constructor(lefts, rights, thresholds, indices, classes) {
        this.lefts = lefts;
        this.rights = rights;
        this.thresholds = thresholds;
        this.indices = indices;
        this.classes = classes;
    }

    compute(features) {
        let node = 0;
        while (this.thresholds[node] !== -2) {
            const next = features[this.indices[node]] <= this.thresholds[node]
                ? this.lefts[node]
                : this.rights[node];
            if (next === -1) {
                return new Array(this.classes[0].length).fill(0);
            }
            node = next;
        }
        return this.classes[node];
    }

{{methods}}
}

if (require.main === module) {
    const features = process.argv.slice(2).map(Number);
    if (features.length !== {{n_features}}) {
        console.error(`expected {{n_features}} features, got ${features.length}`);
        process.exit(1);
    }
    {{lefts}}
    {{rights}}
    {{thresholds}}
    {{indices}}
    {{classes}}
    const model = new {{class_name}}(lefts, rights, thresholds, indices, classes);
    {{output}}
}
"#,
    ),
    (
        "tree.combined",
        r#"class {{class_name}} {

    constructor(lefts, rights, thresholds, indices, classes) {
        this.lefts = lefts;
        this.rights = rights;
        this.thresholds = thresholds;
        this.indices = indices;
        this.classes = classes;
    }

    compute(features) {
        const classes = new Array({{n_classes}}).fill(0);
        {{tree}}
        return classes;
    }

{{methods}}
}

if (require.main === module) {
    const features = process.argv.slice(2).map(Number);
    if (features.length !== {{n_features}}) {
        console.error(`expected {{n_features}} features, got ${features.length}`);
        process.exit(1);
    }
    {{lefts}}
    {{rights}}
    {{thresholds}}
    {{indices}}
    {{classes}}
    const model = new {{class_name}}(lefts, rights, thresholds, indices, classes);
    {{output}}
}
"#,
    ),
    (
        "tree.exported",
        r#"const fs = require('fs');

class {{class_name}} {

    constructor(lefts, rights, thresholds, indices, classes) {
        this.lefts = lefts;
        this.rights = rights;
        this.thresholds = thresholds;
        this.indices = indices;
        this.classes = classes;
    }

    compute(features) {
        let node = 0;
        while (this.thresholds[node] !== -2) {
            const next = features[this.indices[node]] <= this.thresholds[node]
                ? this.lefts[node]
                : this.rights[node];
            if (next === -1) {
                return new Array(this.classes[0].length).fill(0);
            }
            node = next;
        }
        return this.classes[node];
    }

{{methods}}
}

if (require.main === module) {
    const data = JSON.parse(fs.readFileSync(process.argv[2], 'utf8'));
    const features = process.argv.slice(3).map(Number);
    if (features.length !== {{n_features}}) {
        console.error(`expected {{n_features}} features, got ${features.length}`);
        process.exit(1);
    }
    const model = new {{class_name}}(data.lefts, data.rights, data.thresholds, data.indices, data.classes);
    {{output}}
}
"#,
    ),
    // ─── Multi-layer perceptron ────────────────────────────────────
    ("activation.hidden.identity", "return v;"),
    (
        "activation.hidden.logistic",
        "return v.map((x) => 1 / (1 + Math.exp(-x)));",
    ),
    ("activation.hidden.tanh", "return v.map((x) => Math.tanh(x));"),
    ("activation.hidden.relu", "return v.map((x) => Math.max(0, x));"),
    ("activation.output.identity", "return v;"),
    (
        "activation.output.logistic",
        "return v.map((x) => 1 / (1 + Math.exp(-x)));",
    ),
    (
        "activation.output.softmax",
        r#"const max = Math.max(...v);
        const exps = v.map((x) => Math.exp(x - max));
        const sum = exps.reduce((a, b) => a + b, 0);
        return exps.map((x) => x / sum);"#,
    ),
    (
        "mlp.classifier",
        r#"    predictProba(features) {
        const out = this.forward(features);
        if (out.length === 1) {
            return [1 - out[0], out[0]];
        }
        return out;
    }

    predict(features) {
        const probabilities = this.predictProba(features);
        let index = 0;
        for (let i = 1; i < probabilities.length; i++) {
            if (probabilities[i] > probabilities[index]) {
                index = i;
            }
        }
        return index;
    }"#,
    ),
    (
        "mlp.regressor",
        r#"    predict(features) {
        return this.forward(features)[0];
    }"#,
    ),
    (
        "mlp.class",
        r#"class {{class_name}} {

    constructor(layers, weights, bias) {
        this.layers = layers;
        this.weights = weights;
        this.bias = bias;
    }

    hidden(v) {
        {{hidden_activation}}
    }

    output(v) {
        {{output_activation}}
    }

    forward(features) {
        let activations = features;
        for (let i = 0; i < this.layers.length; i++) {
            const next = this.bias[i].slice();
            for (let j = 0; j < activations.length; j++) {
                for (let k = 0; k < next.length; k++) {
                    next[k] += activations[j] * this.weights[i][j][k];
                }
            }
            activations = i === this.layers.length - 1 ? this.output(next) : this.hidden(next);
        }
        return activations;
    }

{{methods}}
}"#,
    ),
    (
        "mlp.attached",
        r#"{{class}}

if (require.main === module) {
    const features = process.argv.slice(2).map(Number);
    if (features.length !== {{n_features}}) {
        console.error(`expected {{n_features}} features, got ${features.length}`);
        process.exit(1);
    }
    {{layers}}
    {{weights}}
    {{bias}}
    const model = new {{class_name}}(layers, weights, bias);
    {{output}}
}
"#,
    ),
    (
        "mlp.exported",
        r#"const fs = require('fs');

{{class}}

if (require.main === module) {
    const data = JSON.parse(fs.readFileSync(process.argv[2], 'utf8'));
    const features = process.argv.slice(3).map(Number);
    if (features.length !== {{n_features}}) {
        console.error(`expected {{n_features}} features, got ${features.length}`);
        process.exit(1);
    }
    const model = new {{class_name}}(data.layers, data.weights, data.bias);
    {{output}}
}
"#,
    ),
];
