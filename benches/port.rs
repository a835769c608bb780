//! Code generation throughput on a synthetic full binary tree.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use porter::model::{TreeModel, LEAF};
use porter::{port, Converter, Language, Method, Mode, ModelDescriptor, Target};

/// Full binary tree of the given depth over `depth` features, three classes.
fn synthetic_tree(depth: u32) -> TreeModel {
    let n = (1usize << (depth + 1)) - 1;
    let first_leaf = (1usize << depth) - 1;
    let mut tree = TreeModel::default();
    for node in 0..n {
        if node < first_leaf {
            tree.lefts.push((2 * node + 1) as i64);
            tree.rights.push((2 * node + 2) as i64);
            tree.thresholds.push(node as f64 * 0.125 + 0.0625);
            tree.indices.push((node % depth as usize) as i64);
            tree.classes.push(vec![1, 1, 1]);
        } else {
            tree.lefts.push(-1);
            tree.rights.push(-1);
            tree.thresholds.push(LEAF);
            tree.indices.push(-2);
            let mut counts = vec![0, 0, 0];
            counts[node % 3] = 5;
            tree.classes.push(counts);
        }
    }
    tree
}

fn bench_port(c: &mut Criterion) {
    let mut group = c.benchmark_group("port_tree");
    for depth in [6, 10] {
        let model = ModelDescriptor::from(synthetic_tree(depth));
        for (language, mode) in [
            (Language::Java, Mode::Attached),
            (Language::JavaScript, Mode::Combined),
            (Language::Go, Mode::Exported),
        ] {
            let target = Target::new(language, mode, Method::PredictProba, "Tree")
                .with_converter(Converter::fixed(6));
            let id = BenchmarkId::new(format!("{}-{}", language.key(), mode.key()), depth);
            group.bench_with_input(id, &model, |b, model| {
                b.iter(|| port(black_box(model), &target).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_port);
criterion_main!(benches);
