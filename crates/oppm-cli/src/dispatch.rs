use std::fs;
use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use oppm_core::Metadata;
use oppm_installer::{
    audit, clean_apps, create_shim, default_root, delete_shim, install_app, list_shims,
    load_metadata, migrate_root, pack_root, rebuild_root, remove_app, repair, save_metadata,
    sync_from_disk, ConfigStore, HealthReport, MigrateOutcome, RepairSummary, RootLayout,
};

use crate::cli::{Cli, Commands, ExeCommands};
use crate::completion::write_completions_script;
use crate::render::{
    current_output_style, format_table, render_section_header, render_status_line, start_spinner,
    OutputStyle,
};

pub(crate) fn run_cli(cli: Cli, store: &ConfigStore) -> Result<()> {
    let style = current_output_style();

    match cli.command {
        Commands::Init { root_dir } => {
            let root = match root_dir {
                Some(dir) => dir,
                None => default_root()?,
            };
            let layout = RootLayout::new(root);
            layout.ensure_base_dirs()?;
            let root = layout
                .root_dir()
                .canonicalize()
                .with_context(|| format!("failed to resolve {}", layout.root_dir().display()))?;
            let layout = RootLayout::new(root);
            if !layout.meta_file().exists() {
                save_metadata(&layout, &Metadata::empty())?;
            }
            store.save(&layout)?;
            println!(
                "{}",
                render_status_line(
                    style,
                    "ok",
                    &format!("initialized root at {}", layout.root_dir().display())
                )
            );
            print_lines(&path_instruction_lines(&layout.shims_dir()));
        }
        Commands::List => {
            let layout = store.load()?;
            let meta = load_metadata(&layout)?;
            if meta.apps.is_empty() {
                println!(
                    "{}",
                    render_status_line(style, "warn", "no applications installed")
                );
            } else {
                let rows: Vec<(String, String)> = meta
                    .sorted_entries()
                    .iter()
                    .map(|entry| (entry.name.clone(), entry.relative_path.clone()))
                    .collect();
                print_lines(&format_table(&rows));
            }
        }
        Commands::Install { path, name } => {
            let layout = store.load()?;
            layout.ensure_base_dirs()?;
            let spinner = start_spinner(style, "install");
            let result = install_app(&layout, &path, name.as_deref());
            spinner.finish();
            let outcome = result?;
            if outcome.replaced {
                println!(
                    "{}",
                    render_status_line(
                        style,
                        "warn",
                        &format!("replaced the previous install of '{}'", outcome.name)
                    )
                );
            }
            println!(
                "{}",
                render_status_line(style, "ok", &format!("installed '{}'", outcome.name))
            );
        }
        Commands::Remove { name } => {
            let layout = store.load()?;
            let report = remove_app(&layout, &name)?;
            for shim in &report.removed_shims {
                println!(
                    "{}",
                    render_status_line(style, "step", &format!("removed shim '{shim}'"))
                );
            }
            if report.dir_missing {
                println!(
                    "{}",
                    render_status_line(
                        style,
                        "warn",
                        "application directory was already gone"
                    )
                );
            }
            println!(
                "{}",
                render_status_line(style, "ok", &format!("removed '{}'", report.name))
            );
        }
        Commands::Update => {
            let layout = store.load()?;
            let report = sync_from_disk(&layout)?;
            if report.is_noop() {
                println!(
                    "{}",
                    render_status_line(
                        style,
                        "ok",
                        "metadata already matches the applications directory"
                    )
                );
            } else {
                for name in &report.added {
                    println!(
                        "{}",
                        render_status_line(style, "step", &format!("recorded '{name}'"))
                    );
                }
                for name in &report.removed {
                    println!(
                        "{}",
                        render_status_line(style, "step", &format!("dropped '{name}'"))
                    );
                }
                println!(
                    "{}",
                    render_status_line(style, "ok", "metadata resynchronized")
                );
            }
        }
        Commands::Clean => {
            let layout = store.load()?;
            let summary = clean_apps(&layout)?;
            println!(
                "{}",
                render_status_line(
                    style,
                    "ok",
                    &format!(
                        "removed {} applications and {} shims",
                        summary.removed_apps.len(),
                        summary.removed_shims.len()
                    )
                )
            );
        }
        Commands::Migrate { new_root } => {
            let layout = store.load()?;
            match migrate_root(store, layout.root_dir(), &new_root)? {
                MigrateOutcome::SameLocation => {
                    println!(
                        "{}",
                        render_status_line(style, "warn", "the root already lives there")
                    );
                }
                MigrateOutcome::Moved(new_layout) => {
                    println!(
                        "{}",
                        render_status_line(
                            style,
                            "ok",
                            &format!("moved root to {}", new_layout.root_dir().display())
                        )
                    );
                    print_lines(&path_instruction_lines(&new_layout.shims_dir()));
                }
            }
        }
        Commands::Pack { output, overwrite } => {
            let layout = store.load()?;
            let spinner = start_spinner(style, "pack");
            let result = pack_root(&layout, output.as_deref(), overwrite);
            spinner.finish();
            let archive = result?;
            println!(
                "{}",
                render_status_line(
                    style,
                    "ok",
                    &format!("packed root into {}", archive.display())
                )
            );
        }
        Commands::Rebuild {
            archive,
            root_dir,
            force,
        } => {
            let target = match root_dir {
                Some(dir) => dir,
                None => default_root()?,
            };
            let replace_existing = if dir_has_content(&target) {
                force || confirm_overwrite(&target)?
            } else {
                false
            };
            let spinner = start_spinner(style, "rebuild");
            let result = rebuild_root(store, &archive, &target, replace_existing);
            spinner.finish();
            let layout = result?;
            println!(
                "{}",
                render_status_line(
                    style,
                    "ok",
                    &format!("rebuilt root at {}", layout.root_dir().display())
                )
            );
            print_lines(&path_instruction_lines(&layout.shims_dir()));
        }
        Commands::Exe { command } => match command {
            ExeCommands::Add { path, name } => {
                let layout = store.load()?;
                let shim_name = match name {
                    Some(name) => name,
                    None => default_shim_name(&path)?,
                };
                create_shim(&layout, &path, &shim_name)?;
                println!(
                    "{}",
                    render_status_line(style, "ok", &format!("created shim '{shim_name}'"))
                );
            }
            ExeCommands::Delete { name } => {
                let layout = store.load()?;
                delete_shim(&layout, &name)?;
                println!(
                    "{}",
                    render_status_line(style, "ok", &format!("deleted shim '{name}'"))
                );
            }
            ExeCommands::Show => {
                let layout = store.load()?;
                let shims = list_shims(&layout)?;
                if shims.is_empty() {
                    println!("{}", render_status_line(style, "warn", "no shims created"));
                } else {
                    let rows: Vec<(String, String)> = shims
                        .into_iter()
                        .map(|(name, target)| (name, target.display().to_string()))
                        .collect();
                    print_lines(&format_table(&rows));
                }
            }
        },
        Commands::Config => {
            let layout = store.load()?;
            if let Some(header) = render_section_header(style, "configuration") {
                println!("{header}");
            }
            println!(
                "{}",
                render_status_line(
                    style,
                    "step",
                    &format!("config file: {}", store.path().display())
                )
            );
            print_lines(&format_table(&config_rows(&layout)));
        }
        Commands::Health { fix } => {
            let layout = store.load()?;
            let report = audit(&layout)?;
            if let Some(header) = render_section_header(style, "store audit") {
                println!("{header}");
            }
            print_lines(&format_health_lines(&report, style));
            if fix {
                let summary = repair(&layout)?;
                print_lines(&format_repair_lines(&summary, style));
            } else if !report.is_clean() {
                bail!(
                    "health check found {} issues; run `oppm health --fix` to repair them",
                    report.issue_count()
                );
            }
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub(crate) fn default_shim_name(executable: &Path) -> Result<String> {
    executable
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .ok_or_else(|| {
            anyhow!(
                "cannot derive a shim name from {}; pass one with --name",
                executable.display()
            )
        })
}

pub(crate) fn config_rows(layout: &RootLayout) -> Vec<(String, String)> {
    vec![
        ("root_dir".to_string(), layout.root_dir().display().to_string()),
        ("apps_dir".to_string(), layout.apps_dir().display().to_string()),
        ("meta_file".to_string(), layout.meta_file().display().to_string()),
        ("shims_dir".to_string(), layout.shims_dir().display().to_string()),
    ]
}

/// Every category is rendered, passing or not, so "no orphaned directories"
/// is a visible fact rather than a silent omission.
pub(crate) fn format_health_lines(report: &HealthReport, style: OutputStyle) -> Vec<String> {
    let categories: [(&str, &Vec<String>); 7] = [
        ("invalid metadata entries", &report.invalid_apps),
        ("empty application directories", &report.empty_apps),
        ("orphaned directories", &report.orphaned_dirs),
        ("stray files in the applications directory", &report.stray_files),
        ("broken shims", &report.broken_shims),
        (
            "shims pointing outside the applications directory",
            &report.external_shims,
        ),
        ("non-symlink entries in the shims directory", &report.non_symlink_shims),
    ];
    categories
        .into_iter()
        .map(|(label, names)| {
            if names.is_empty() {
                render_status_line(style, "ok", &format!("no {label}"))
            } else {
                render_status_line(
                    style,
                    "err",
                    &format!("{label} ({}): {}", names.len(), names.join(", ")),
                )
            }
        })
        .collect()
}

pub(crate) fn format_repair_lines(summary: &RepairSummary, style: OutputStyle) -> Vec<String> {
    if summary.total() == 0 {
        return vec![render_status_line(style, "ok", "nothing to repair")];
    }
    let counts = [
        (summary.entries_pruned, "pruned metadata entries"),
        (summary.empty_dirs_removed, "removed empty directories"),
        (summary.orphans_adopted, "adopted orphaned directories"),
        (summary.strays_removed, "removed stray files"),
        (summary.shims_removed, "removed invalid shims"),
    ];
    let mut lines: Vec<String> = counts
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| render_status_line(style, "step", &format!("{label}: {count}")))
        .collect();
    lines.push(render_status_line(
        style,
        "ok",
        &format!("repaired {} issues", summary.total()),
    ));
    lines
}

pub(crate) fn path_instruction_lines(shims_dir: &Path) -> Vec<String> {
    if cfg!(windows) {
        vec![
            "add the shims directory to PATH:".to_string(),
            format!("  setx PATH \"%PATH%;{}\"", shims_dir.display()),
        ]
    } else {
        vec![
            "add the shims directory to PATH:".to_string(),
            format!("  export PATH=\"{}:$PATH\"", shims_dir.display()),
        ]
    }
}

fn dir_has_content(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Interactive y/n for rebuilding onto a non-empty target; a non-interactive
/// caller has to pass --force instead.
fn confirm_overwrite(target: &Path) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "target directory {} is not empty; pass --force to replace its contents",
            target.display()
        );
    }
    print!(
        "target directory {} is not empty; replace its contents? [y/N] ",
        target.display()
    );
    std::io::stdout().flush().context("failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read the confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
