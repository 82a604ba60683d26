use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::thread_rng;

use threshold_pre::crypto::keys::KeyPair;
use threshold_pre::{encapsulate, reconstruct, reencrypt, split_delegation, ReencryptedFragment, ThresholdPolicy};

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_delegation");
    let mut rng = thread_rng();
    let owner = KeyPair::generate(&mut rng);
    let recipient = KeyPair::generate(&mut rng);

    for (n, t) in [(3usize, 2usize), (10, 7), (32, 22)] {
        let policy = ThresholdPolicy::new(n, t).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(format!("{t}-of-{n}")), &policy, |b, policy| {
            b.iter(|| {
                split_delegation(black_box(owner.secret()), recipient.public(), policy, &mut thread_rng()).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    let mut rng = thread_rng();
    let owner = KeyPair::generate(&mut rng);
    let recipient = KeyPair::generate(&mut rng);

    for (n, t) in [(3usize, 2usize), (10, 7), (32, 22)] {
        let policy = ThresholdPolicy::new(n, t).unwrap();
        let encapsulated = encapsulate(owner.public(), &mut rng).unwrap();
        let fragments = split_delegation(owner.secret(), recipient.public(), &policy, &mut rng).unwrap();
        let quorum: Vec<ReencryptedFragment> = fragments
            .iter()
            .take(t)
            .map(|f| reencrypt(f, &encapsulated.capsule))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(format!("{t}-of-{n}")), &quorum, |b, quorum| {
            b.iter(|| reconstruct(&recipient, black_box(quorum), t).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_split, bench_reconstruct);
criterion_main!(benches);
