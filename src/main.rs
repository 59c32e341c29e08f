// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dotlens CLI entrypoint.
//!
//! By default this runs the interactive TUI on a directory of dot files. `--list` and
//! `--print` are non-interactive and exit after writing to stdout.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use dotlens::logging::{init_logging, LogTarget};
use dotlens::model::FileName;
use dotlens::store::{DotFolder, LogFileInfo};
use dotlens::viewer::{ViewState, Viewer};

const DIR_ENV: &str = "DOTLENS_DIR";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<dir>] [--log-file <path>]\n  {program} [--dir <dir>] [--log-file <path>]\n  {program} [<dir>] --list [--json]\n  {program} [<dir>] --print <file>\n\nIf dir/--dir is omitted, ${DIR_ENV} is used, then the current working directory.\n\n--list prints the dot files in the directory, one per line (--json: with log metadata).\n--print renders one file to stdout.\n--log-file appends logs to a file; otherwise logs go to stderr for --list/--print and are\ndiscarded in the TUI. The filter is read from $DOTLENS_LOG (default: info)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    dir: Option<String>,
    list: bool,
    json: bool,
    print: Option<String>,
    log_file: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dir" => {
                if options.dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.dir = Some(dir);
            }
            "--list" => {
                if options.list {
                    return Err(());
                }
                options.list = true;
            }
            "--json" => {
                if options.json {
                    return Err(());
                }
                options.json = true;
            }
            "--print" => {
                if options.print.is_some() {
                    return Err(());
                }
                let file = args.next().ok_or(())?;
                options.print = Some(file);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.log_file = Some(path);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.dir.is_some() {
                    return Err(());
                }
                options.dir = Some(arg);
            }
        }
    }

    if options.list && options.print.is_some() {
        return Err(());
    }

    if options.json && !options.list {
        return Err(());
    }

    Ok(options)
}

fn log_target(options: &CliOptions) -> LogTarget {
    match &options.log_file {
        Some(path) => LogTarget::File(PathBuf::from(path)),
        None if options.list || options.print.is_some() => LogTarget::Stderr,
        None => LogTarget::Discard,
    }
}

fn resolve_dir(options: &CliOptions) -> String {
    options
        .dir
        .clone()
        .or_else(|| std::env::var(DIR_ENV).ok().filter(|dir| !dir.trim().is_empty()))
        .unwrap_or_else(|| ".".to_owned())
}

#[derive(Debug, Serialize)]
struct ListedFile<'a> {
    name: &'a FileName,
    log: Option<LogFileInfo>,
}

fn write_listing(out: &mut impl Write, files: &[FileName], json: bool) -> io::Result<()> {
    if json {
        let listed = files
            .iter()
            .map(|name| ListedFile {
                name,
                log: LogFileInfo::parse(name),
            })
            .collect::<Vec<_>>();
        serde_json::to_writer_pretty(&mut *out, &listed)?;
        writeln!(out)?;
    } else {
        for name in files {
            writeln!(out, "{name}")?;
        }
    }
    Ok(())
}

fn print_file(viewer: &mut Viewer, raw_name: &str) -> Result<(), Box<dyn Error>> {
    let name = FileName::new(raw_name)?;
    match viewer.select(&name) {
        ViewState::Rendered { rendered, .. } => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered.text)?;
            Ok(())
        }
        ViewState::Error { message, .. } => Err(format!("{name}: {message}").into()),
        ViewState::Idle => Err(format!("{name}: nothing rendered").into()),
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "dotlens".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(&log_target(&options))?;

        let folder = DotFolder::new(resolve_dir(&options));
        let mut viewer = Viewer::new(folder.clone());

        if options.list {
            let files = viewer.list_available_files()?;
            let mut stdout = io::stdout().lock();
            write_listing(&mut stdout, &files, options.json)?;
            return Ok(());
        }

        if let Some(raw_name) = options.print.as_deref() {
            return print_file(&mut viewer, raw_name);
        }

        dotlens::tui::run(folder)
    })();

    if let Err(err) = result {
        eprintln!("dotlens: {err}");
        std::process::exit(1);
    }
}
