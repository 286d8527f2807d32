use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dispatcher_farms::{
    DispatcherBuilder, FarmBuilder, FarmSet, FarmSetBuilder, Params, RuleEntry, RuleKind, order,
    parse,
};

fn with_rules(mut builder: FarmBuilder, n: usize) -> FarmBuilder {
    builder = builder.docroot("/var/www/html");
    for i in 0..n {
        let rank = i64::try_from(n - i).unwrap_or(0);
        builder = builder
            .filter(|f| f.allow().field("url", format!("/content/{i}/*")).rank(rank))
            .cache_rule(|r| r.allow().glob(&format!("/content/{i}/*.html")))
            .allowed_client(|a| a.deny().glob(&format!("10.0.{i}.*")).rank(rank));
    }
    builder
}

fn farm_params(n: usize) -> Params {
    with_rules(FarmBuilder::new("bench"), n).params().clone()
}

fn farm_set(farms: usize, rules: usize) -> FarmSet {
    let mut builder = FarmSetBuilder::new(DispatcherBuilder::new(
        "/etc/httpd/dispatcher.any",
        "/var/log/httpd/dispatcher.log",
        "/etc/httpd/modules/mod_dispatcher.so",
    ));
    for i in 0..farms {
        builder = builder.farm(&format!("farm{i}"), |f| with_rules(f, rules));
    }
    builder.build()
}

fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("order");

    for n in [10, 100, 1000] {
        let entries: Vec<RuleEntry> = (0..n)
            .map(|i| {
                let entry = RuleEntry::new(RuleKind::Filter).with("type", "allow");
                if i % 3 == 0 { entry } else { entry.ranked(i64::from(i % 17)) }
            })
            .collect();
        group.bench_function(&format!("{n}_entries"), |b| {
            b.iter(|| order(black_box(&entries)));
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for n in [1, 10, 100] {
        let params = farm_params(n);
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| dispatcher_farms::compile("bench", black_box(&params)).unwrap());
        });
    }

    for farms in [1, 10] {
        let set = farm_set(farms, 10);
        group.bench_function(&format!("{farms}_farm_set"), |b| {
            b.iter(|| black_box(&set).compile().unwrap());
        });
    }

    group.finish();
}

fn bench_write_and_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");

    for n in [10, 100] {
        let compiled = dispatcher_farms::compile("bench", &farm_params(n)).unwrap();
        let text = compiled.text();
        group.bench_function(&format!("write_{n}_rules"), |b| {
            b.iter(|| black_box(compiled.document()).to_string());
        });
        group.bench_function(&format!("parse_{n}_rules"), |b| {
            b.iter(|| parse(black_box(&text)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_order, bench_compile, bench_write_and_parse);
criterion_main!(benches);
