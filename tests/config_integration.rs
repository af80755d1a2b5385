use std::path::PathBuf;

use mdpage::config::{
    ConfigFlags, clear_config_flags, load_config_flags, parse_flag_tokens, save_config_flags,
};
use mdpage::render::StyleMode;
use mdpage::source::PagerMode;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mdpagerc");
    let content = r#"
# comment
--pager always

--style light
   
--debug-log=events.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.pager, Some(PagerMode::Always));
    assert_eq!(flags.style, Some(StyleMode::Light));
    assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    assert!(!flags.perf);
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mdpagerc");
    std::fs::write(&path, "--perf\n--style light\n--width 90\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = ["mdpage", "--style", "dark", "-p", "notes.md"]
        .map(String::from)
        .to_vec();
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.perf, "file flags should remain enabled");
    assert_eq!(effective.style, Some(StyleMode::Dark), "cli should override style");
    assert_eq!(effective.width, Some(90), "file width survives");
    assert_eq!(effective.pager, Some(PagerMode::Always));
}

#[test]
fn test_local_file_overrides_global_file() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".mdpagerc");

    save_config_flags(
        &global,
        &ConfigFlags {
            style: Some(StyleMode::Light),
            width: Some(70),
            ..ConfigFlags::default()
        },
    )
    .unwrap();
    std::fs::write(&local, "--width 0\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(merged.style, Some(StyleMode::Light));
    assert_eq!(merged.width, Some(0));

    clear_config_flags(&global).unwrap();
    assert_eq!(load_config_flags(&global).unwrap(), ConfigFlags::default());
}
