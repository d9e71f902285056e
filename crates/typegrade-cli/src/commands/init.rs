//! The `typegrade init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("typegrade.toml").exists() {
        println!("typegrade.toml already exists, skipping.");
    } else {
        std::fs::write("typegrade.toml", SAMPLE_CONFIG)?;
        println!("Created typegrade.toml");
    }

    std::fs::create_dir_all("attempts")?;
    let example_path = std::path::Path::new("attempts/example.toml");
    if example_path.exists() {
        println!("attempts/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ATTEMPT_SET)?;
        println!("Created attempts/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own attempts to attempts/example.toml");
    println!("  2. Run: typegrade validate --attempts attempts/example.toml");
    println!("  3. Run: typegrade run --attempts attempts/example.toml --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# typegrade configuration

output_dir = "./typegrade-results"
default_format = "json"
show_alignment = true
# Largest alignment table (reference words + 1) x (typed words + 1) to compute.
max_alignment_cells = 4004001
"#;

const EXAMPLE_ATTEMPT_SET: &str = r#"[attempt_set]
id = "example"
name = "Example Attempts"
description = "Three attempts at the same clip"

[[attempts]]
id = "careful"
audio_id = "clip-1"
reference = "o gato preto dormiu no sofá."
typed = "o gato preto dormiu no sofá."
wpm = 38.0
tags = ["demo"]

[[attempts]]
id = "hasty"
audio_id = "clip-1"
reference = "o gato preto dormiu no sofá."
typed = "o gato dormiu no sofa"
wpm = 55.0
tags = ["demo"]

[[attempts]]
id = "timed"
audio_id = "clip-1"
reference = "o gato preto dormiu no sofá."
typed = "o gato preto dormiu no sofá. ontem"
elapsed_secs = 12.0
"#;
