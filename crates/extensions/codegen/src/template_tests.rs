use super::*;
use serde_json::json;

fn params(pairs: &[(&str, &str)]) -> ParamsMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn slots(pairs: &[(&str, &str)]) -> Slots {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_simple_present_and_absent() {
    let p = params(&[("base_url", "https://example.com")]);
    assert_eq!(
        substitute_params("${params.base_url}/path", &p),
        "https://example.com/path"
    );
    assert_eq!(substitute_params("${params.missing}", &p), "${params.missing}");
}

#[test]
fn test_simple_ignores_default_syntax() {
    let p = params(&[]);
    assert_eq!(substitute_params("${params.a|b}", &p), "${params.a|b}");
}

#[test]
fn test_simple_empty_value_is_used() {
    let p = params(&[("q", "")]);
    assert_eq!(substitute_params("[${params.q}]", &p), "[]");
}

#[test]
fn test_defaulted() {
    let p = params(&[("target", "universe"), ("empty", "")]);
    assert_eq!(substitute_defaulted("${params.target|world}", &p), "universe");
    assert_eq!(substitute_defaulted("${params.other|world}", &p), "world");
    assert_eq!(substitute_defaulted("${params.empty|fallback}", &p), "fallback");
    assert_eq!(substitute_defaulted("${params.other|}", &p), "");
}

#[test]
fn test_defaulted_bare_form_behaves_like_simple() {
    let p = params(&[("a", "1")]);
    assert_eq!(substitute_defaulted("${params.a}-${params.b}", &p), "1-${params.b}");
}

#[test]
fn test_single_pass() {
    // A value that looks like a placeholder is not expanded again.
    let p = params(&[("a", "${params.b}"), ("b", "nope")]);
    assert_eq!(substitute_params("${params.a}", &p), "${params.b}");
    assert_eq!(substitute_defaulted("${params.a|x}", &p), "${params.b}");
}

#[test]
fn test_slots() {
    let s = slots(&[("script_path", "/w/run.py")]);
    assert_eq!(
        substitute_slots("python ${script_path} ${unknown}", &s),
        "python /w/run.py ${unknown}"
    );
}

#[test]
fn test_render_command_mixed() {
    let p = params(&[("target", "universe")]);
    let s = slots(&[("action_script", "echo"), ("template", "echo")]);
    assert_eq!(
        render_command(
            "${action_script} ${template} ${params.target|world} ${params.n|1} ${other}",
            &p,
            &s
        ),
        "echo echo universe 1 ${other}"
    );
}

#[test]
fn test_render_command_slot_value_not_reexpanded() {
    let p = params(&[("x", "1")]);
    let s = slots(&[("script_path", "${params.x}")]);
    assert_eq!(render_command("${script_path}", &p, &s), "${params.x}");
}

#[test]
fn test_substitute_value_recursive() {
    let p = params(&[("q", "rust")]);
    let value = json!({
        "url": "https://s.example/?q=${params.q}",
        "selectors": ["#${params.q}", {"selector": ".${params.q}"}],
        "timeout": 5000,
        "flag": true
    });
    let out = substitute_value(&value, &p);
    assert_eq!(out["url"], "https://s.example/?q=rust");
    assert_eq!(out["selectors"][0], "#rust");
    assert_eq!(out["selectors"][1]["selector"], ".rust");
    assert_eq!(out["timeout"], 5000);
    assert_eq!(out["flag"], true);
}

#[test]
fn test_split_command_quotes() {
    let argv = split_command(r#"python -c 'print("hello", "universe")'"#).unwrap();
    assert_eq!(argv, vec!["python", "-c", r#"print("hello", "universe")"#]);
}

#[test]
fn test_split_command_errors() {
    assert!(split_command("   ").is_err());
    assert!(split_command("echo 'unterminated").is_err());
}
