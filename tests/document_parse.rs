use dispatcher_farms::{Document, Node, Params, Value, compile, parse};

const HAND_WRITTEN: &str = r#"
# publish farm, maintained by hand
/publish {
  /clientheaders { "*" }
  /virtualhosts {
    "www.example.com"   # primary
    "example.com"
  }
  /renders {
    /rend01 { /hostname "127.0.0.1" /port 4503 }
  }
  /filter {
    /0001 { /type "deny" /glob "*" }
    /0002 { /type "allow" /url "/content/*" /extension '(css|js|html)' }
  }
  /cache {
    /docroot "/var/www/html"
    /rules { /0 { /type "allow" /glob "*.html" } }
  }
}
"#;

#[test]
fn parse_hand_written_farm() {
    let doc = parse(HAND_WRITTEN).unwrap();
    assert_eq!(doc.nodes.len(), 1);

    let hosts = doc.find("publish/virtualhosts").unwrap();
    let values: Vec<_> = hosts.children().iter().filter_map(Node::rendered_value).collect();
    assert_eq!(values, ["\"www.example.com\"", "\"example.com\""]);

    let port = doc.find("publish/renders/rend01/port").unwrap();
    assert_eq!(port.rendered_value(), Some("4503"));

    let ext = doc.find("publish/filter/0002/extension").unwrap();
    assert_eq!(ext.rendered_value(), Some("'(css|js|html)'"));

    let docroot = doc.find("publish/cache/docroot").unwrap();
    assert_eq!(docroot.rendered_value(), Some("\"/var/www/html\""));
}

#[test]
fn from_str_matches_parse() {
    let doc: Document = HAND_WRITTEN.parse().unwrap();
    assert_eq!(doc, parse(HAND_WRITTEN).unwrap());
}

#[test]
fn rewrite_is_canonical() {
    let doc = parse(HAND_WRITTEN).unwrap();
    let canonical = doc.to_string();
    assert!(canonical.starts_with("/publish {\n  /clientheaders {\n    \"*\"\n  }\n"));
    assert!(canonical.contains("    /rend01 { /hostname \"127.0.0.1\" /port 4503 }\n"));
    assert_eq!(parse(&canonical).unwrap(), doc);
}

#[test]
fn compiled_farm_reads_back() {
    let params = Params::from([
        ("docroot".to_owned(), Value::from("/var/www")),
        ("cache_headers".to_owned(), Value::from(vec!["Cache-Control"])),
        (
            "filters".to_owned(),
            Value::List(vec![Value::record([
                ("type", "allow"),
                ("selectors", "'(print|thumb)'"),
            ])]),
        ),
    ]);
    let farm = compile("site", &params).unwrap();
    let parsed: Document = farm.text().parse().unwrap();
    assert_eq!(&parsed, farm.document());
}

#[test]
fn empty_and_comment_only_input() {
    assert!(parse("").unwrap().nodes.is_empty());
    assert!(parse("  # nothing here\n\n# still nothing").unwrap().nodes.is_empty());
}

#[test]
fn include_directive() {
    let doc = parse("/farms {\n  $include \"dispatcher.*.inc.any\"\n}\n").unwrap();
    let farms = doc.get("farms").unwrap();
    assert_eq!(
        farms.children(),
        [Node::Include("\"dispatcher.*.inc.any\"".into())]
    );
}

#[test]
fn unterminated_block_reports_offset() {
    let err = parse("/farms {\n  /site { /docroot \"/x\"\n").unwrap_err();
    assert!(err.offset() > 0);
    assert!(err.to_string().starts_with("parse error at byte"));
}

#[test]
fn unterminated_string() {
    assert!(parse("/site { /docroot \"/var/www }").is_err());
}

#[test]
fn unquoted_paths_in_hand_written_file() {
    let doc = parse("/site {\n  /cache {\n    /docroot /var/www/html\n    /statfile /tmp/.stat\n  }\n}\n").unwrap();
    let docroot = doc.find("site/cache/docroot").unwrap();
    assert_eq!(docroot.rendered_value(), Some("/var/www/html"));
    let statfile = doc.find("site/cache/statfile").unwrap();
    assert_eq!(statfile.rendered_value(), Some("/tmp/.stat"));
}

#[test]
fn missing_property_value() {
    assert!(parse("/site { /docroot }").is_err());
}
