use crate::render::render_section;
use crate::types::VANITY_URL_ENDPOINT;
use crate::{
    CompiledFarm, CompiledFarmSet, Diagnostic, Diagnostics, Document, Farm, FarmSet, Node, Params,
    RenderError, RuleKind, Scalar, Toggle,
};

/// Validate a farm's parameters and compile them into its document.
///
/// No text is produced when validation fails.
///
/// ```
/// use dispatcher_farms::{compile, Params, Value};
///
/// let params = Params::from([("docroot".to_owned(), Value::from("/var/www"))]);
/// let farm = compile("aem-site", &params).unwrap();
/// assert!(farm.text().contains("/docroot \"/var/www\""));
/// assert_eq!(farm.file_name(), "dispatcher.00-aem-site.inc.any");
/// ```
///
/// # Errors
///
/// Returns [`Diagnostics`] listing every validation failure.
pub fn compile(name: &str, params: &Params) -> Result<CompiledFarm, Diagnostics> {
    let farm = crate::validate::farm(name, params)?;
    compile_farm(&farm).map_err(|e| Diagnostics::from(Diagnostic::from(e)))
}

/// Compile an already typed farm.
///
/// # Errors
///
/// Returns [`RenderError`] when a rule entry carries a field its kind does not
/// define, which only happens for farms assembled by hand.
pub fn compile_farm(farm: &Farm) -> Result<CompiledFarm, RenderError> {
    tracing::debug!(farm = %farm.name, priority = farm.priority(), "compiling farm");

    let mut body = Vec::new();
    body.extend(values("clientheaders", &farm.client_headers, Some("*")));
    body.extend(values("virtualhosts", &farm.virtualhosts, Some("*")));
    if let Some(session) = &farm.session_management {
        let mut children = vec![prop("directory", session.directory.as_str())];
        children.extend(session.encode.map(|e| prop("encode", e.as_str())));
        children.extend(session.header.as_deref().map(|h| prop("header", h)));
        children.extend(session.timeout.map(|t| prop("timeout", t)));
        body.push(Node::block("sessionmanagement", children));
    }
    body.push(renders(farm));
    body.extend(section(farm, RuleKind::Filter)?);
    if let Some(vanity) = &farm.vanity_urls {
        let mut children = vec![
            prop("url", VANITY_URL_ENDPOINT),
            prop("file", vanity.file.as_str()),
        ];
        children.extend(vanity.delay.map(|d| prop("delay", d)));
        body.push(Node::block("vanity_urls", children));
    }
    body.extend(toggle("propagateSyndPost", farm.propagate_synd_post));
    body.push(cache(farm)?);
    body.extend(section(farm, RuleKind::Statistics)?);
    if let Some(paths) = values("paths", &farm.sticky_connections, None) {
        body.push(Node::block("stickyConnections", vec![paths]));
    }
    if let Some(url) = farm.health_check_url.as_deref() {
        body.push(Node::block("health_check", vec![prop("url", url)]));
    }
    body.extend(farm.retry_delay.map(|v| prop("retryDelay", v)));
    body.extend(farm.retries.map(|v| prop("numberOfRetries", v)));
    body.extend(farm.unavailable_penalty.map(|v| prop("unavailablePenalty", v)));
    body.extend(toggle("failover", farm.failover));

    tracing::debug!(farm = %farm.name, sections = body.len(), "compiled farm");

    Ok(CompiledFarm {
        name: farm.name.clone(),
        priority: farm.priority(),
        document: Document::new(vec![Node::block(farm.name.as_str(), body)]),
    })
}

/// Validate and compile a whole set.
///
/// Farms are composed ordered by priority, then by declaration order.
///
/// # Errors
///
/// Returns [`Diagnostics`] for the dispatcher parameters and every farm,
/// plus a diagnostic per duplicated farm name.
pub fn compile_set(set: &FarmSet) -> Result<CompiledFarmSet, Diagnostics> {
    let (dispatcher, mut farms) = crate::validate::farm_set(set)?;
    farms.sort_by_key(Farm::priority);

    let mut compiled = Vec::with_capacity(farms.len());
    let mut errors = Diagnostics::new();
    for farm in &farms {
        match compile_farm(farm) {
            Ok(c) => compiled.push(c),
            Err(e) => errors.push(Diagnostic::from(e)),
        }
    }
    tracing::debug!(farms = compiled.len(), "compiled farm set");

    errors.into_result(CompiledFarmSet {
        farms: compiled,
        dispatcher,
    })
}

fn section(farm: &Farm, kind: RuleKind) -> Result<Option<Node>, RenderError> {
    render_section(kind, farm.rules(kind))
}

fn cache(farm: &Farm) -> Result<Node, RenderError> {
    let mut children = vec![prop("docroot", farm.docroot.as_str())];
    children.extend(farm.stat_file.as_deref().map(|v| prop("statfile", v)));
    children.extend(farm.stat_files_level.map(|v| prop("statfileslevel", v)));
    children.extend(toggle("allowAuthorized", farm.allow_authorized));
    children.extend(toggle("serveStaleOnError", farm.serve_stale));
    children.extend(section(farm, RuleKind::CacheRule)?);
    match farm.invalidate_handler.as_deref() {
        Some(handler) => children.push(prop("invalidateHandler", handler)),
        None => children.extend(section(farm, RuleKind::Invalidate)?),
    }
    children.extend(section(farm, RuleKind::AllowedClient)?);
    children.extend(section(farm, RuleKind::IgnoreUrlParam)?);
    children.extend(values("headers", &farm.cache_headers, None));
    children.extend(farm.grace_period.map(|v| prop("gracePeriod", v)));
    children.extend(toggle("enableTTL", farm.cache_ttl));
    Ok(Node::block("cache", children))
}

fn renders(farm: &Farm) -> Node {
    let default;
    let renderers = if farm.renders.is_empty() {
        default = [crate::Renderer::default_publish()];
        &default[..]
    } else {
        &farm.renders[..]
    };
    let children = renderers
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut fields = vec![
                prop("hostname", r.hostname.as_str()),
                prop("port", i64::from(r.port)),
            ];
            fields.extend(r.timeout.map(|t| prop("timeout", t)));
            fields.extend(r.receive_timeout.map(|t| prop("receiveTimeout", t)));
            fields.extend(toggle("ipv4", r.ipv4));
            Node::block(format!("renderer{i}"), fields)
        })
        .collect();
    Node::block("renders", children)
}

fn prop(name: &str, value: impl Into<Scalar>) -> Node {
    Node::property(name, &value.into())
}

fn toggle(name: &str, value: Option<Toggle>) -> Option<Node> {
    value.map(|t| prop(name, t))
}

/// A block of bare values, or the fallback value when there are none.
fn values(name: &str, items: &[String], fallback: Option<&str>) -> Option<Node> {
    let children: Vec<Node> = if items.is_empty() {
        fallback.into_iter().map(|v| Node::value(&v.into())).collect()
    } else {
        items.iter().map(|v| Node::value(&v.as_str().into())).collect()
    };
    (!children.is_empty()).then(|| Node::block(name, children))
}
