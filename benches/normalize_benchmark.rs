use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sentimen::text::normalize;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normalize");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_review", |b| {
        b.iter(|| normalize(black_box("Aplikasinya BAGUS!! tapi error")))
    });

    group.bench_function("review_with_urls", |b| {
        b.iter(|| {
            normalize(black_box(
                "Keren banget!!! cek https://contoh.id/promo?ref=abc dan www.contoh.id \
                 sebelum beli, jangan lupa kode diskon :)",
            ))
        })
    });

    group.bench_function("long_review", |b| {
        let review = "Awalnya ragu beli di sini, tapi ternyata barangnya sesuai deskripsi. \
                      Pengiriman cepat, packing rapi, seller responsif. Minusnya cuma \
                      aplikasinya suka lambat pas jam ramai dan notifikasi kadang telat. "
            .repeat(20);
        b.iter(|| normalize(black_box(&review)))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
