//! C99 templates. Trees only; compiled with `gcc -std=c99 -lm`.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("int", "int"),
    ("double", "double"),
    ("indent", "    "),
    ("in_brackets", "{{{value}}}"),
    ("arr[]", "{{type}} {{name}}[{{n}}] = {{values}};"),
    ("arr[][]", "{{type}} {{name}}[{{n}}][{{m}}] = {{values}};"),
    ("if", "if ({{features}}[{{index}}] {{op}} {{threshold}}) {"),
    ("else", "} else {"),
    ("endif", "}"),
    ("assign", "{{classes}}[{{index}}] = {{value}}"),
    ("join", ";"),
    (
        "output.predict",
        r#"printf("{\"predict\": %d}\n", predict(features));"#,
    ),
    (
        "output.predict_proba",
        r#"double probabilities[N_CLASSES];
    predict_proba(features, probabilities);
    printf("{\"predict\": %d, \"predictProba\": [", predict(features));
    for (int i = 0; i < N_CLASSES; i++) {
        printf(i > 0 ? ", %.17g" : "%.17g", probabilities[i]);
    }
    printf("]}\n");"#,
    ),
    (
        "tree.methods",
        r#"int predict(double features[]) {
    int classes[N_CLASSES] = {0};
    compute(features, classes);
    int index = 0;
    for (int i = 1; i < N_CLASSES; i++) {
        if (classes[i] > classes[index]) {
            index = i;
        }
    }
    return index;
}

void predict_proba(double features[], double probabilities[]) {
    int classes[N_CLASSES] = {0};
    compute(features, classes);
    long sum = 0;
    for (int i = 0; i < N_CLASSES; i++) {
        sum += classes[i];
    }
    for (int i = 0; i < N_CLASSES; i++) {
        probabilities[i] = sum > 0 ? (double) classes[i] / sum : 0.0;
    }
}"#,
    ),
    (
        "tree.attached",
        r#"#include <stdio.h>
#include <stdlib.h>

#define N_FEATURES {{n_features}}
#define N_CLASSES {{n_classes}}

{{lefts}}
{{rights}}
{{thresholds}}
{{indices}}
{{classes}}

void compute(double features[], int out[]) {
    int node = 0;
    while (thresholds[node] != -2) {
        int next = features[indices[node]] <= thresholds[node] ? lefts[node] : rights[node];
        if (next == -1) {
            for (int i = 0; i < N_CLASSES; i++) {
                out[i] = 0;
            }
            return;
        }
        node = next;
    }
    for (int i = 0; i < N_CLASSES; i++) {
        out[i] = classes[node][i];
    }
}

{{methods}}

int main(int argc, const char *argv[]) {
    if (argc - 1 != N_FEATURES) {
        fprintf(stderr, "expected %d features, got %d\n", N_FEATURES, argc - 1);
        return 1;
    }
    double features[N_FEATURES];
    for (int i = 1; i < argc; i++) {
        features[i - 1] = atof(argv[i]);
    }
    {{output}}
    return 0;
}
"#,
    ),
    (
        "tree.combined",
        r#"#include <stdio.h>
#include <stdlib.h>

#define N_FEATURES {{n_features}}
#define N_CLASSES {{n_classes}}

{{lefts}}
{{rights}}
{{thresholds}}
{{indices}}
{{classes}}

void compute(double features[], int classes[]) {
    {{tree}}
}

{{methods}}

int main(int argc, const char *argv[]) {
    if (argc - 1 != N_FEATURES) {
        fprintf(stderr, "expected %d features, got %d\n", N_FEATURES, argc - 1);
        return 1;
    }
    double features[N_FEATURES];
    for (int i = 1; i < argc; i++) {
        features[i - 1] = atof(argv[i]);
    }
    {{output}}
    return 0;
}
"#,
    ),
];
