// lens-relay - Build Task Runner
// Unified build system using cargo xtask pattern

use anyhow::{Context, Result};
use xshell::{Shell, cmd};

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => {
            let release = args.contains(&"--release".to_string());
            build(&sh, release)
        },
        Some("test") => test(&sh),
        Some("format") => {
            let check = args.contains(&"--check".to_string());
            format(&sh, check)
        },
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("clean") => clean(&sh),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        _ => {
            print_help();
            Ok(())
        },
    }
}

fn print_help() {
    println!("lens-relay - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release]   Build the relay");
    println!("  test                Run all tests");
    println!("  format [--check]    Format code (check mode doesn't modify)");
    println!("  clippy              Run clippy checks");
    println!("  run [ARGS...]       Run the relay (args are passed to the binary)");
    println!("  clean               Clean build artifacts");
    println!("  ci                  Run all CI checks (format + clippy + test)");
    println!("  dist                Create distribution package (tar.gz)");
    println!();
    println!("Examples:");
    println!("  cargo xtask build --release");
    println!("  cargo xtask run -- --config conf/config.toml");
    println!("  cargo xtask format --check");
}

/// Build the backend
fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🦀 Building lens-relay{}...", if release { " (release)" } else { "" });

    let _dir = sh.push_dir(project_root());
    if release {
        cmd!(sh, "cargo build --release -p lens-relay")
            .run()
            .context("Failed to build lens-relay in release mode")?;
    } else {
        cmd!(sh, "cargo build -p lens-relay")
            .run()
            .context("Failed to build lens-relay")?;
    }

    println!("✅ Build complete");
    Ok(())
}

/// Run all tests
fn test(sh: &Shell) -> Result<()> {
    println!("🧪 Running tests...");

    let _dir = sh.push_dir(project_root());
    cmd!(sh, "cargo test --workspace").run().context("Tests failed")?;

    println!("✅ All tests passed!");
    Ok(())
}

/// Format code
fn format(sh: &Shell, check: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    if check {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all").run().context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

/// Run clippy checks
fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    cmd!(sh, "cargo clippy --workspace --all-targets -- --deny warnings --allow clippy::uninlined-format-args")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

/// Run the relay with the given arguments
fn run(sh: &Shell, args: &[String]) -> Result<()> {
    println!("▶️  Starting lens-relay...");

    let _dir = sh.push_dir(project_root());
    let args = args.iter().skip_while(|arg| arg.as_str() == "--");
    cmd!(sh, "cargo run -p lens-relay -- {args...}")
        .run()
        .context("Failed to run lens-relay")?;

    Ok(())
}

/// Clean build artifacts
fn clean(sh: &Shell) -> Result<()> {
    println!("🧹 Cleaning build artifacts...");

    let project = project_root();
    let _dir = sh.push_dir(&project);
    cmd!(sh, "cargo clean").run()?;

    let build_dir = project.join("build");
    if build_dir.exists() {
        sh.remove_path(&build_dir)?;
    }

    println!("✅ Clean complete!");
    Ok(())
}

/// Run all CI checks (format + clippy + test)
fn ci(sh: &Shell) -> Result<()> {
    println!("🔄 Running CI pipeline...");

    println!("📝 [1/3] Checking code format...");
    format(sh, true)?;

    println!("🔍 [2/3] Running clippy checks...");
    clippy(sh)?;

    println!("🧪 [3/3] Running tests...");
    test(sh)?;

    println!("🎉 CI pipeline completed successfully!");
    Ok(())
}

/// Create distribution package (tar.gz) with the binary and sample config
fn dist(sh: &Shell) -> Result<()> {
    println!("📦 Creating distribution package...");
    build(sh, true)?;

    let project = project_root();
    let dist_dir = project.join("build/dist");
    sh.create_dir(dist_dir.join("bin"))?;
    sh.create_dir(dist_dir.join("conf"))?;
    sh.create_dir(dist_dir.join("logs"))?;

    sh.copy_file(project.join("target/release/lens-relay"), dist_dir.join("bin"))?;
    sh.copy_file(project.join("conf/config.toml"), dist_dir.join("conf"))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("lens-relay-{}.tar.gz", timestamp);

    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf logs")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created!");
    println!("   Location: {}", dist_dir.join(&package_name).display());
    Ok(())
}

/// Get project root directory
fn project_root() -> std::path::PathBuf {
    std::path::Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(|path| path.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}
