use dispatcher_farms::{RuleEntry, RuleKind, order, render_section};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let filters = vec![
        RuleEntry::new(RuleKind::Filter)
            .ranked(20)
            .with("type", "allow")
            .with("extension", "'(css|js)'"),
        RuleEntry::new(RuleKind::Filter).with("type", "deny").with("glob", "*"),
        RuleEntry::new(RuleKind::Filter)
            .ranked(10)
            .with("type", "allow")
            .with("url", "/content/*"),
        RuleEntry::new(RuleKind::Filter)
            .ranked(10)
            .with("type", "deny")
            .with("selectors", "'(feed|infinity)'"),
    ];

    for ranked in order(&filters) {
        let rank = ranked.item.rank.map_or("-".to_owned(), |r| r.to_string());
        println!("/{} <- rank {rank}", ranked.index);
    }
    println!();

    let section = render_section(RuleKind::Filter, &filters)
        .expect("entries match the filter schema")
        .expect("a non-empty collection always renders");
    print!("{section}");
}
