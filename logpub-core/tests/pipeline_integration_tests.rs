// logpub-core/tests/pipeline_integration_tests.rs
use anyhow::Result;
use std::path::PathBuf;
use test_log::test;

use logpub_core::{
    prepare_log_body, HostEnvironment, LogPipeline, PublishOptions, RedactionConfig, Transport,
};

fn host() -> HostEnvironment {
    HostEnvironment::new(
        PathBuf::from("/opt/games/rimworld"),
        PathBuf::from("/home/player"),
    )
}

#[test]
fn benign_input_only_gets_line_endings_normalized() -> Result<()> {
    let raw = "first line\r\nsecond line\nthird line\r\n";
    let (body, summary) = prepare_log_body(raw, &host(), PublishOptions::default())?;
    assert_eq!(body, "first line\nsecond line\nthird line\n");
    assert_eq!(summary.total_redactions(), 0);
    assert!(!summary.truncated);
    assert!(!summary.consolidation_degraded);
    Ok(())
}

#[test]
fn install_path_never_survives_processing() -> Result<()> {
    let raw = "Mono config path = '/opt/games/rimworld/MonoBleedingEdge/etc'\n\
               Loading '/opt/games/rimworld/Data/resources.assets'\n";
    let (body, summary) = prepare_log_body(raw, &host(), PublishOptions::default())?;
    assert!(!body.contains("/opt/games/rimworld"));
    assert!(body.contains("[Install_dir]/MonoBleedingEdge/etc"));
    assert_eq!(summary.total_redactions(), 2);
    Ok(())
}

#[test]
fn player_connection_block_is_redacted_between_markers() -> Result<()> {
    let raw = "PlayerConnection initialized from /tmp (debug = 0)\n\
               multi-casting on [225.0.0.222:54997]\n\
               Initialize engine version: 2019.4.30f1\n";
    let (body, _) = prepare_log_body(raw, &host(), PublishOptions::default())?;
    assert!(body.contains("PlayerConnection [PlayerConnect information redacted]\n"));
    assert!(body.contains("Initialize engine version: 2019.4.30f1"));
    assert!(!body.contains("multi-casting"));
    Ok(())
}

#[test]
fn renderer_block_is_redacted_unless_platform_info_is_kept() -> Result<()> {
    let raw = "GfxDevice: creating device client\nRenderer: NVIDIA GeForce RTX 3080\n\
               Vendor: NVIDIA\nBegin MonoManager ReloadAssembly\n";

    let (body, _) = prepare_log_body(raw, &host(), PublishOptions::default())?;
    assert!(body.contains("GfxDevice: [Renderer information redacted]\nBegin MonoManager"));
    assert!(!body.contains("NVIDIA"));

    let options = PublishOptions {
        include_platform_info: true,
        ..Default::default()
    };
    let (body, summary) = prepare_log_body(raw, &host(), options)?;
    assert!(body.contains("Renderer: NVIDIA GeForce RTX 3080"));
    assert_eq!(summary.total_redactions(), 0);
    Ok(())
}

#[test]
fn repeated_spam_collapses_through_the_full_pipeline() -> Result<()> {
    let mut raw = String::from("startup ok\n");
    raw.push_str(&"NullReferenceException at Update()\n".repeat(120));
    raw.push_str("shutdown\n");

    let (body, _) = prepare_log_body(&raw, &host(), PublishOptions::default())?;
    assert_eq!(body.matches("NullReferenceException").count(), 1);
    assert!(body.contains("########## The preceding line was repeated 119 times ##########"));
    Ok(())
}

#[test]
fn oversized_logs_are_trimmed_to_the_budget() -> Result<()> {
    // Distinct lines so the consolidator leaves the log alone.
    let raw: String = (0..10_500).map(|i| format!("line {i}\n")).collect();
    let (body, summary) = prepare_log_body(&raw, &host(), PublishOptions::default())?;
    assert!(summary.truncated);
    assert_eq!(body.lines().count(), 10_001);
    assert!(body.ends_with(
        "(log trimmed to 10,000 lines. Use publishing options to upload the full log)"
    ));
    Ok(())
}

#[test]
fn unlimited_size_is_honored_for_the_gist_transport_only() -> Result<()> {
    let raw: String = (0..10_500).map(|i| format!("line {i}\n")).collect();

    let options = PublishOptions {
        allow_unlimited_log_size: true,
        transport: Transport::Gist,
        ..Default::default()
    };
    let (body, summary) = prepare_log_body(&raw, &host(), options)?;
    assert!(!summary.truncated);
    assert_eq!(body, raw);

    let options = PublishOptions {
        allow_unlimited_log_size: true,
        transport: Transport::Paste,
        ..Default::default()
    };
    let (_, summary) = prepare_log_body(&raw, &host(), options)?;
    assert!(summary.truncated);
    Ok(())
}

#[test]
fn processing_is_idempotent_on_its_own_output() -> Result<()> {
    let raw = "a\n \n \nb\nUnloadTime: 2.5 ms\n \nSteamworks: SetMinidumpSteamID(42)\n";
    let (once, _) = prepare_log_body(raw, &host(), PublishOptions::default())?;
    let (twice, _) = prepare_log_body(&once, &host(), PublishOptions::default())?;
    assert_eq!(once, "a\nb\n[Steam Id redacted]\n");
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn pipeline_can_be_reused_across_runs() -> Result<()> {
    let config = RedactionConfig::load_default_rules()?;
    let pipeline = LogPipeline::new(&config, &host(), PublishOptions::default())?;

    let (first, _) = pipeline.run("one\r\n")?;
    let (second, _) = pipeline.run("two\r\n")?;
    assert_eq!(first, "one\n");
    assert_eq!(second, "two\n");
    Ok(())
}
