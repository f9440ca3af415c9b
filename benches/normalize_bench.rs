use criterion::{criterion_group, criterion_main, Criterion};
use recherche::{Language, Normalizer};

const PARAGRAPH: &str = "L'indexation inversée permet de retrouver rapidement les documents \
pertinents. Les moteurs de recherche indexent des millions de pages web quotidiennement, et \
les algorithmes de compression réduisent la taille des données stockées. La parallélisation \
accélère le traitement de grandes quantités d'informations.";

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new(Language::French);
    let text = PARAGRAPH.repeat(50);
    c.bench_function("normalize_french_text", |b| b.iter(|| normalizer.normalize(&text)));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
