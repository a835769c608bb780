//! Java templates. Trees and MLP classifiers; EXPORTED programs read their
//! data file with Gson.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("int", "int"),
    ("double", "double"),
    ("indent", "    "),
    ("in_brackets", "{{{value}}}"),
    ("arr[]", "{{type}}[] {{name}} = {{values}};"),
    ("arr[][]", "{{type}}[][] {{name}} = {{values}};"),
    ("arr[][][]", "{{type}}[][][] {{name}} = {{values}};"),
    ("if", "if ({{features}}[{{index}}] {{op}} {{threshold}}) {"),
    ("else", "} else {"),
    ("endif", "}"),
    ("assign", "{{classes}}[{{index}}] = {{value}}"),
    ("join", ";"),
    (
        "output.predict",
        r#"System.out.println("{\"predict\": " + model.predict(features) + "}");"#,
    ),
    (
        "output.predict_proba",
        r#"double[] probabilities = model.predictProba(features);
        StringBuilder out = new StringBuilder();
        out.append("{\"predict\": ").append(model.predict(features)).append(", \"predictProba\": [");
        for (int i = 0; i < probabilities.length; i++) {
            if (i > 0) {
                out.append(", ");
            }
            out.append(probabilities[i]);
        }
        out.append("]}");
        System.out.println(out);"#,
    ),
    // ─── Decision tree ─────────────────────────────────────────────
    (
        "tree.methods",
        r#"    public int predict(double[] features) {
        int[] classes = this.compute(features);
        int index = 0;
        for (int i = 1; i < classes.length; i++) {
            if (classes[i] > classes[index]) {
                index = i;
            }
        }
        return index;
    }

    public double[] predictProba(double[] features) {
        int[] classes = this.compute(features);
        long sum = 0;
        for (int count : classes) {
            sum += count;
        }
        double[] probabilities = new double[classes.length];
        for (int i = 0; i < classes.length; i++) {
            probabilities[i] = sum > 0 ? (double) classes[i] / sum : 0.0;
        }
        return probabilities;
    }"#,
    ),
    (
        "tree.attached",
        r#"public class {{class_name}} {

    private int[] lefts;
    private int[] rights;
    private double[] thresholds;
    private int[] indices;
    private int[][] classes;

    public {{class_name}}(int[] lefts, int[] rights, double[] thresholds, int[] indices, int[][] classes) {
        this.lefts = lefts;
        this.rights = rights;
        this.thresholds = thresholds;
        this.indices = indices;
        this.classes = classes;
    }

    private int[] compute(double[] features) {
        int node = 0;
        while (this.thresholds[node] != -2) {
            int next = features[this.indices[node]] <= this.thresholds[node] ? this.lefts[node] : this.rights[node];
            if (next == -1) {
                return new int[this.classes[0].length];
            }
            node = next;
        }
        return this.classes[node];
    }

{{methods}}

    public static void main(String[] args) {
        if (args.length != {{n_features}}) {
            System.err.println("expected {{n_features}} features, got " + args.length);
            System.exit(1);
        }
        double[] features = new double[args.length];
        for (int i = 0; i < args.length; i++) {
            features[i] = Double.parseDouble(args[i]);
        }
        {{lefts}}
        {{rights}}
        {{thresholds}}
        {{indices}}
        {{classes}}
        {{class_name}} model = new {{class_name}}(lefts, rights, thresholds, indices, classes);
        {{output}}
    }
}
"#,
    ),
    (
        "tree.combined",
        r#"public class {{class_name}} {

    private int[] lefts;
    private int[] rights;
    private double[] thresholds;
    private int[] indices;
    private int[][] classes;

    public {{class_name}}(int[] lefts, int[] rights, double[] thresholds, int[] indices, int[][] classes) {
        this.lefts = lefts;
        this.rights = rights;
        this.thresholds = thresholds;
        this.indices = indices;
        this.classes = classes;
    }

    private int[] compute(double[] features) {
        int[] classes = new int[{{n_classes}}];
        {{tree}}
        return classes;
    }

{{methods}}

    public static void main(String[] args) {
        if (args.length != {{n_features}}) {
            System.err.println("expected {{n_features}} features, got " + args.length);
            System.exit(1);
        }
        double[] features = new double[args.length];
        for (int i = 0; i < args.length; i++) {
            features[i] = Double.parseDouble(args[i]);
        }
        {{lefts}}
        {{rights}}
        {{thresholds}}
        {{indices}}
        {{classes}}
        {{class_name}} model = new {{class_name}}(lefts, rights, thresholds, indices, classes);
        {{output}}
    }
}
"#,
    ),
    (
        "tree.exported",
        r#"import com.google.gson.Gson;

import java.io.IOException;
import java.nio.charset.StandardCharsets;
import java.nio.file.Files;
import java.nio.file.Paths;

public class {{class_name}} {

    private static class Data {
        private int[] lefts;
        private int[] rights;
        private double[] thresholds;
        private int[] indices;
        private int[][] classes;
    }

    private int[] lefts;
    private int[] rights;
    private double[] thresholds;
    private int[] indices;
    private int[][] classes;

    public {{class_name}}(String file) throws IOException {
        String json = new String(Files.readAllBytes(Paths.get(file)), StandardCharsets.UTF_8);
        Data data = new Gson().fromJson(json, Data.class);
        this.lefts = data.lefts;
        this.rights = data.rights;
        this.thresholds = data.thresholds;
        this.indices = data.indices;
        this.classes = data.classes;
    }

    private int[] compute(double[] features) {
        int node = 0;
        while (this.thresholds[node] != -2) {
            int next = features[this.indices[node]] <= this.thresholds[node] ? this.lefts[node] : this.rights[node];
            if (next == -1) {
                return new int[this.classes[0].length];
            }
            node = next;
        }
        return this.classes[node];
    }

{{methods}}

    public static void main(String[] args) throws IOException {
        if (args.length != {{n_features}} + 1) {
            System.err.println("expected a data file and {{n_features}} features, got " + args.length + " arguments");
            System.exit(1);
        }
        double[] features = new double[args.length - 1];
        for (int i = 1; i < args.length; i++) {
            features[i - 1] = Double.parseDouble(args[i]);
        }
        {{class_name}} model = new {{class_name}}(args[0]);
        {{output}}
    }
}
"#,
    ),
    // ─── Multi-layer perceptron ────────────────────────────────────
    ("activation.hidden.identity", "return v;"),
    (
        "activation.hidden.logistic",
        r#"double[] out = new double[v.length];
        for (int i = 0; i < v.length; i++) {
            out[i] = 1.0 / (1.0 + Math.exp(-v[i]));
        }
        return out;"#,
    ),
    (
        "activation.hidden.tanh",
        r#"double[] out = new double[v.length];
        for (int i = 0; i < v.length; i++) {
            out[i] = Math.tanh(v[i]);
        }
        return out;"#,
    ),
    (
        "activation.hidden.relu",
        r#"double[] out = new double[v.length];
        for (int i = 0; i < v.length; i++) {
            out[i] = Math.max(0.0, v[i]);
        }
        return out;"#,
    ),
    ("activation.output.identity", "return v;"),
    (
        "activation.output.logistic",
        r#"double[] out = new double[v.length];
        for (int i = 0; i < v.length; i++) {
            out[i] = 1.0 / (1.0 + Math.exp(-v[i]));
        }
        return out;"#,
    ),
    (
        "activation.output.softmax",
        r#"double max = Double.NEGATIVE_INFINITY;
        for (double x : v) {
            max = Math.max(max, x);
        }
        double[] out = new double[v.length];
        double sum = 0.0;
        for (int i = 0; i < v.length; i++) {
            out[i] = Math.exp(v[i] - max);
            sum += out[i];
        }
        for (int i = 0; i < v.length; i++) {
            out[i] /= sum;
        }
        return out;"#,
    ),
    (
        "mlp.classifier",
        r#"    public double[] predictProba(double[] features) {
        double[] out = this.forward(features);
        if (out.length == 1) {
            return new double[] {1.0 - out[0], out[0]};
        }
        return out;
    }

    public int predict(double[] features) {
        double[] probabilities = this.predictProba(features);
        int index = 0;
        for (int i = 1; i < probabilities.length; i++) {
            if (probabilities[i] > probabilities[index]) {
                index = i;
            }
        }
        return index;
    }"#,
    ),
    (
        "mlp.class",
        r#"    private int[] layers;
    private double[][][] weights;
    private double[][] bias;

    public {{class_name}}(int[] layers, double[][][] weights, double[][] bias) {
        this.layers = layers;
        this.weights = weights;
        this.bias = bias;
    }

    private static double[] hidden(double[] v) {
        {{hidden_activation}}
    }

    private static double[] output(double[] v) {
        {{output_activation}}
    }

    private double[] forward(double[] features) {
        double[] activations = features;
        for (int i = 0; i < this.layers.length; i++) {
            double[] next = this.bias[i].clone();
            for (int j = 0; j < activations.length; j++) {
                for (int k = 0; k < next.length; k++) {
                    next[k] += activations[j] * this.weights[i][j][k];
                }
            }
            activations = i == this.layers.length - 1 ? output(next) : hidden(next);
        }
        return activations;
    }

{{methods}}"#,
    ),
    (
        "mlp.attached",
        r#"public class {{class_name}} {

{{class}}

    public static void main(String[] args) {
        if (args.length != {{n_features}}) {
            System.err.println("expected {{n_features}} features, got " + args.length);
            System.exit(1);
        }
        double[] features = new double[args.length];
        for (int i = 0; i < args.length; i++) {
            features[i] = Double.parseDouble(args[i]);
        }
        {{layers}}
        {{weights}}
        {{bias}}
        {{class_name}} model = new {{class_name}}(layers, weights, bias);
        {{output}}
    }
}
"#,
    ),
    (
        "mlp.exported",
        r#"import com.google.gson.Gson;

import java.io.IOException;
import java.nio.charset.StandardCharsets;
import java.nio.file.Files;
import java.nio.file.Paths;

public class {{class_name}} {

    private static class Data {
        private int[] layers;
        private double[][][] weights;
        private double[][] bias;
    }

{{class}}

    public static void main(String[] args) throws IOException {
        if (args.length != {{n_features}} + 1) {
            System.err.println("expected a data file and {{n_features}} features, got " + args.length + " arguments");
            System.exit(1);
        }
        String json = new String(Files.readAllBytes(Paths.get(args[0])), StandardCharsets.UTF_8);
        Data data = new Gson().fromJson(json, Data.class);
        double[] features = new double[args.length - 1];
        for (int i = 1; i < args.length; i++) {
            features[i - 1] = Double.parseDouble(args[i]);
        }
        {{class_name}} model = new {{class_name}}(data.layers, data.weights, data.bias);
        {{output}}
    }
}
"#,
    ),
];
