//! Startup text menu: help, settings and world selection.
//!
//! Runs over any line reader and writer so the driver can hand it stdin and
//! stdout while tests feed it scripted input.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::core::config::{Settings, SETTING_KEYS};
use crate::core::Result;
use crate::persist;

/// World chosen at the menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuOutcome {
    pub world_name: String,
    /// True if no world with this name exists yet
    pub new_world: bool,
}

const TITLE: &str = "PUNDUS";

const HELP: &str = "\
Pundus is a voxel sandbox: a 1024³ world of packed voxels with falling sand,
flowing water and a block editor.

Move with WASD, space to rise and shift to sink. Left click places blocks,
right click breaks them and the scroll wheel resizes the brush. Number keys
pick the block type and P toggles physics.";

/// One-line explanation shown before a setting is edited
fn describe(key: &str) -> &'static str {
    match key {
        "res" => "Divides the screen resolution for the coarse pass. Higher is faster and blurrier (minimum 1).",
        "dist" => "How far the renderer traces, in voxels.",
        "sim" => "Width of the area around you where physics runs. It always covers the full height.",
        "tick" => "Physics steps per frame. High values are expensive.",
        "diam" => "Distance over which voxels occlude each other.",
        "skip" => "Sample stride for ambient occlusion. Higher is cheaper but noisier (minimum 1).",
        _ => "",
    }
}

/// Line-oriented startup menu
pub struct Menu {
    worlds_dir: PathBuf,
}

impl Menu {
    pub fn new(worlds_dir: impl Into<PathBuf>) -> Self {
        Self {
            worlds_dir: worlds_dir.into(),
        }
    }

    pub fn worlds_dir(&self) -> &Path {
        &self.worlds_dir
    }

    /// Run until a world is chosen. Settings edits apply to `settings` as
    /// they are made. Returns None if input ends first.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
        settings: &mut Settings,
    ) -> Result<Option<MenuOutcome>> {
        writeln!(output, "{}\n", TITLE)?;
        loop {
            writeln!(
                output,
                "Type 'help' for a guide, 'settings' for options, or 'worlds' to pick a world.\n"
            )?;
            let Some(command) = prompt(input, output, "Input: ")? else {
                return Ok(None);
            };
            match command.as_str() {
                "help" => writeln!(output, "\n{} HELP\n\n{}\n", TITLE, HELP)?,
                "settings" => {
                    if !self.settings_menu(input, output, settings)? {
                        return Ok(None);
                    }
                }
                "worlds" => match self.worlds_menu(input, output)? {
                    WorldChoice::Chosen(outcome) => return Ok(Some(outcome)),
                    WorldChoice::Back => continue,
                    WorldChoice::Eof => return Ok(None),
                },
                _ => writeln!(output, "\nInvalid command.\n")?,
            }
        }
    }

    /// Returns false if input ended
    fn settings_menu<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
        settings: &mut Settings,
    ) -> Result<bool> {
        loop {
            writeln!(output, "\n{} SETTINGS\n", TITLE)?;
            for (key, label) in SETTING_KEYS {
                let current = settings.display_value(key).unwrap_or_default();
                let name = format!("{}: '{}'", label, key);
                writeln!(output, "{:<42} Currently at: {}", name, current)?;
            }
            writeln!(output, "Exit settings: 'exit'")?;

            let Some(key) = prompt(input, output, "\nSetting: ")? else {
                return Ok(false);
            };
            if key == "exit" {
                writeln!(output)?;
                return Ok(true);
            }
            if settings.display_value(&key).is_none() {
                writeln!(output, "\nInvalid setting.")?;
                continue;
            }

            writeln!(output, "{}", describe(&key))?;
            let Some(value) = prompt(input, output, "\nValue: ")? else {
                return Ok(false);
            };
            match settings.set(&key, &value) {
                Ok(()) => writeln!(
                    output,
                    "\n'{}' set to: {}",
                    key,
                    settings.display_value(&key).unwrap_or_default()
                )?,
                Err(e) => {
                    log::debug!("Rejected setting: {}", e);
                    writeln!(output, "\nInvalid value.")?;
                }
            }
        }
    }

    fn worlds_menu<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<WorldChoice> {
        writeln!(output, "\n{} WORLDS\n", TITLE)?;
        writeln!(output, "Type a new name to create a world.")?;
        let existing = persist::list_worlds(&self.worlds_dir);
        if !existing.is_empty() {
            writeln!(output, "Or type an existing name to load it:\n")?;
            for name in &existing {
                writeln!(output, "{}", name)?;
            }
        }

        loop {
            let Some(name) = prompt(input, output, "\nWorld name: ")? else {
                return Ok(WorldChoice::Eof);
            };
            if name == "exit" {
                writeln!(output)?;
                return Ok(WorldChoice::Back);
            }
            if name.is_empty() || name.contains(['/', '\\']) {
                writeln!(output, "\nInvalid world name.")?;
                continue;
            }
            let new_world = !existing.contains(&name);
            return Ok(WorldChoice::Chosen(MenuOutcome {
                world_name: name,
                new_world,
            }));
        }
    }
}

enum WorldChoice {
    Chosen(MenuOutcome),
    Back,
    Eof,
}

/// Print `label` and read one trimmed line, None at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
