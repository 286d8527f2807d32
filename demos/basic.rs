use dispatcher_farms::FarmBuilder;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let farm = FarmBuilder::new("publish")
        .docroot("/var/www/html")
        .set("virtualhosts", vec!["www.example.com"])
        .filter(|f| f.deny().glob("*"))
        .filter(|f| f.allow().field("url", "/content/*").rank(10))
        .cache_rule(|r| r.allow().glob("*.html"))
        .compile()
        .expect("failed to compile farm");

    println!("# {}", farm.file_name());
    print!("{}", farm.text());
}
