//! Go templates. Trees only; every program is a single `main` package.

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("int", "int"),
    ("double", "float64"),
    ("indent", "\t"),
    ("in_brackets", "{{{value}}}"),
    ("arr[]", "var {{name}} = []{{type}}{{values}}"),
    ("arr[][]", "var {{name}} = [][]{{type}}{{values}}"),
    ("if", "if {{features}}[{{index}}] {{op}} {{threshold}} {"),
    ("else", "} else {"),
    ("endif", "}"),
    ("assign", "{{classes}}[{{index}}] = {{value}}"),
    ("join", ""),
    (
        "output.predict",
        r#"fmt.Printf("{\"predict\": %d}\n", model.predict(features))"#,
    ),
    (
        "output.predict_proba",
        r#"probabilities := model.predictProba(features)
	fmt.Printf("{\"predict\": %d, \"predictProba\": [", model.predict(features))
	for i, p := range probabilities {
		if i > 0 {
			fmt.Print(", ")
		}
		fmt.Print(strconv.FormatFloat(p, 'g', -1, 64))
	}
	fmt.Println("]}")"#,
    ),
    (
        "tree.methods",
        r#"func (m {{class_name}}) predict(features []float64) int {
	classes := m.compute(features)
	index := 0
	for i := 1; i < len(classes); i++ {
		if classes[i] > classes[index] {
			index = i
		}
	}
	return index
}

func (m {{class_name}}) predictProba(features []float64) []float64 {
	classes := m.compute(features)
	sum := 0
	for _, c := range classes {
		sum += c
	}
	probabilities := make([]float64, len(classes))
	for i, c := range classes {
		if sum > 0 {
			probabilities[i] = float64(c) / float64(sum)
		}
	}
	return probabilities
}"#,
    ),
    (
        "tree.attached",
        r#"package main

import (
	"fmt"
	"os"
	"strconv"
)

{{lefts}}
{{rights}}
{{thresholds}}
{{indices}}
{{classes}}

type {{class_name}} struct {
	Lefts      []int     `json:"lefts"`
	Rights     []int     `json:"rights"`
	Thresholds []float64 `json:"thresholds"`
	Indices    []int     `json:"indices"`
	Classes    [][]int   `json:"classes"`
}

func (m {{class_name}}) compute(features []float64) []int {
	node := 0
	for m.Thresholds[node] != -2 {
		next := m.Rights[node]
		if features[m.Indices[node]] <= m.Thresholds[node] {
			next = m.Lefts[node]
		}
		if next == -1 {
			return make([]int, len(m.Classes[0]))
		}
		node = next
	}
	return m.Classes[node]
}

{{methods}}

func main() {
	args := os.Args[1:]
	if len(args) != {{n_features}} {
		fmt.Fprintf(os.Stderr, "expected %d features, got %d\n", {{n_features}}, len(args))
		os.Exit(1)
	}
	features := make([]float64, 0, len(args))
	for _, arg := range args {
		value, err := strconv.ParseFloat(arg, 64)
		if err != nil {
			fmt.Fprintln(os.Stderr, err)
			os.Exit(1)
		}
		features = append(features, value)
	}
	model := {{class_name}}{lefts, rights, thresholds, indices, classes}
	{{output}}
}
"#,
    ),
    (
        "tree.combined",
        r#"package main

import (
	"fmt"
	"os"
	"strconv"
)

{{lefts}}
{{rights}}
{{thresholds}}
{{indices}}
{{classes}}

type {{class_name}} struct {
	Lefts      []int     `json:"lefts"`
	Rights     []int     `json:"rights"`
	Thresholds []float64 `json:"thresholds"`
	Indices    []int     `json:"indices"`
	Classes    [][]int   `json:"classes"`
}

func (m {{class_name}}) compute(features []float64) []int {
	classes := make([]int, {{n_classes}})
	{{tree}}
	return classes
}

{{methods}}

func main() {
	args := os.Args[1:]
	if len(args) != {{n_features}} {
		fmt.Fprintf(os.Stderr, "expected %d features, got %d\n", {{n_features}}, len(args))
		os.Exit(1)
	}
	features := make([]float64, 0, len(args))
	for _, arg := range args {
		value, err := strconv.ParseFloat(arg, 64)
		if err != nil {
			fmt.Fprintln(os.Stderr, err)
			os.Exit(1)
		}
		features = append(features, value)
	}
	model := {{class_name}}{lefts, rights, thresholds, indices, classes}
	{{output}}
}
"#,
    ),
    (
        "tree.exported",
        r#"package main

import (
	"encoding/json"
	"fmt"
	"os"
	"strconv"
)

type {{class_name}} struct {
	Lefts      []int     `json:"lefts"`
	Rights     []int     `json:"rights"`
	Thresholds []float64 `json:"thresholds"`
	Indices    []int     `json:"indices"`
	Classes    [][]int   `json:"classes"`
}

func (m {{class_name}}) compute(features []float64) []int {
	node := 0
	for m.Thresholds[node] != -2 {
		next := m.Rights[node]
		if features[m.Indices[node]] <= m.Thresholds[node] {
			next = m.Lefts[node]
		}
		if next == -1 {
			return make([]int, len(m.Classes[0]))
		}
		node = next
	}
	return m.Classes[node]
}

{{methods}}

func main() {
	if len(os.Args) < 2 {
		fmt.Fprintln(os.Stderr, "usage: <data.json> <features...>")
		os.Exit(1)
	}
	data, err := os.ReadFile(os.Args[1])
	if err != nil {
		fmt.Fprintln(os.Stderr, err)
		os.Exit(1)
	}
	var model {{class_name}}
	if err := json.Unmarshal(data, &model); err != nil {
		fmt.Fprintln(os.Stderr, err)
		os.Exit(1)
	}
	args := os.Args[2:]
	if len(args) != {{n_features}} {
		fmt.Fprintf(os.Stderr, "expected %d features, got %d\n", {{n_features}}, len(args))
		os.Exit(1)
	}
	features := make([]float64, 0, len(args))
	for _, arg := range args {
		value, err := strconv.ParseFloat(arg, 64)
		if err != nil {
			fmt.Fprintln(os.Stderr, err)
			os.Exit(1)
		}
		features = append(features, value)
	}
	{{output}}
}
"#,
    ),
];
