//! Run command implementation.
//!
//! The `stagecraft run` command walks one session through the pipeline:
//! three selections, three generated assets, then review and export.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::assets::VersionId;
use crate::cli::args::RunArgs;
use crate::config::{load_config, validate, StagecraftConfig};
use crate::diff::DiffStats;
use crate::error::{Result, StagecraftError};
use crate::export::{suggested_file_name, write_to, ExportFormat};
use crate::gateway::{self, GenerationGateway};
use crate::library::{AssetLibrary, JsonFileLibrary};
use crate::pipeline::{Confirmation, PipelineController, PipelineStep, StepState};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Load and validate configuration, reporting problems through `ui`.
///
/// Returns `None` after printing the error; callers exit with code 2.
pub(super) fn load_checked_config(
    project_root: &Path,
    config_override: Option<&Path>,
    ui: &mut dyn UserInterface,
) -> Option<StagecraftConfig> {
    match load_config(project_root, config_override).and_then(|c| validate(&c).map(|_| c)) {
        Ok(config) => Some(config),
        Err(e) => {
            ui.error(&e.to_string());
            None
        }
    }
}

/// What the wizard loop does after handling one step.
enum Flow {
    Continue,
    Done(CommandResult),
}

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: RunArgs,
    gateway: Option<Box<dyn GenerationGateway>>,
    library: Option<Box<dyn AssetLibrary>>,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
            gateway: None,
            library: None,
        }
    }

    /// Use `gateway` instead of the configured one.
    pub fn with_gateway(mut self, gateway: Box<dyn GenerationGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Save finished packages to `library` instead of the configured one.
    pub fn with_library(mut self, library: Box<dyn AssetLibrary>) -> Self {
        self.library = Some(library);
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn export_format(&self, config: &StagecraftConfig) -> Result<ExportFormat> {
        match &self.args.format {
            Some(name) => ExportFormat::from_str(name),
            None => Ok(config.export.format.into()),
        }
    }

    /// Reject flag values the configuration does not offer.
    fn check_flags(&self, config: &StagecraftConfig) -> Result<()> {
        if let Some(channel) = &self.args.channel {
            check_choice("channel", channel, &config.channels)?;
        }
        for platform in &self.args.platforms {
            check_choice("platform", platform, &config.platforms)?;
        }
        if let Some(action) = &self.args.action {
            check_choice("action", action, &config.actions)?;
        }
        Ok(())
    }

    fn run_session(
        &self,
        config: &StagecraftConfig,
        format: ExportFormat,
        gateway: &dyn GenerationGateway,
        library: &dyn AssetLibrary,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let mut controller = PipelineController::new();
        let total = PipelineStep::ALL.len();

        loop {
            let step = controller.current_step();
            ui.show_progress(step.position(), total);
            ui.show_header(step.title());

            let flow = match controller.state() {
                StepState::Selecting => self.select(&mut controller, config, gateway, ui)?,
                StepState::AwaitingGeneration => self.recover(&mut controller, gateway, ui)?,
                StepState::Ready => self.review_asset(&mut controller, gateway, ui)?,
                StepState::Reviewing => {
                    self.review_package(&mut controller, config, format, library, ui)?
                }
                StepState::Generating => {
                    return Err(StagecraftError::InvalidTransition {
                        from: step,
                        message: "generation left in flight".to_string(),
                    })
                }
            };

            if let Flow::Done(result) = flow {
                return Ok(result);
            }
        }
    }

    fn select(
        &self,
        controller: &mut PipelineController,
        config: &StagecraftConfig,
        gateway: &dyn GenerationGateway,
        ui: &mut dyn UserInterface,
    ) -> Result<Flow> {
        let step = controller.current_step();
        match step {
            PipelineStep::Channel => {
                let channel = match &self.args.channel {
                    Some(channel) => channel.clone(),
                    None => {
                        let current = controller.selection().channel.clone();
                        let answer = ui.prompt(&choice_prompt(
                            "channel",
                            "Which channel is this content for?",
                            &config.channels,
                            current,
                        ))?;
                        answer.as_string()
                    }
                };
                if let Err(e) = check_choice("channel", &channel, &config.channels) {
                    return self.reject_selection(e, ui);
                }
                controller.select_channel(channel)?;
            }
            PipelineStep::Platforms => {
                let platforms = if self.args.platforms.is_empty() {
                    let current = controller.selection().platforms.join(",");
                    let default = if current.is_empty() {
                        config.platforms.first().cloned().unwrap_or_default()
                    } else {
                        current
                    };
                    let options = config.platforms.iter().map(|p| PromptOption::plain(p)).collect();
                    let answer = ui.prompt(
                        &Prompt::new(
                            "platforms",
                            "Which platforms should it run on?",
                            PromptType::MultiSelect { options },
                        )
                        .with_default(default),
                    )?;
                    answer.into_strings()
                } else {
                    self.args.platforms.clone()
                };
                if platforms.is_empty() {
                    let e = StagecraftError::ConfigValidationError {
                        message: "Select at least one platform".to_string(),
                    };
                    return self.reject_selection(e, ui);
                }
                if let Some(e) = platforms
                    .iter()
                    .find_map(|p| check_choice("platform", p, &config.platforms).err())
                {
                    return self.reject_selection(e, ui);
                }
                if let Err(e) = controller.set_platforms(platforms) {
                    return self.reject_selection(e, ui);
                }
            }
            PipelineStep::Action => {
                let action = match &self.args.action {
                    Some(action) => action.clone(),
                    None => {
                        let current = controller.selection().action.clone();
                        let answer = ui.prompt(&choice_prompt(
                            "action",
                            "What should the content do?",
                            &config.actions,
                            current,
                        ))?;
                        answer.as_string()
                    }
                };
                if let Err(e) = check_choice("action", &action, &config.actions) {
                    return self.reject_selection(e, ui);
                }
                controller.select_action(action)?;
            }
            _ => return Err(StagecraftError::NotAnAssetStep { step }),
        }

        self.advance(controller, gateway, ui)
    }

    /// Interactive users get asked again; scripted runs stop.
    fn reject_selection(&self, error: StagecraftError, ui: &mut dyn UserInterface) -> Result<Flow> {
        ui.error(&error.to_string());
        if ui.is_interactive() {
            Ok(Flow::Continue)
        } else {
            Ok(Flow::Done(CommandResult::failure(2)))
        }
    }

    fn advance(
        &self,
        controller: &mut PipelineController,
        gateway: &dyn GenerationGateway,
        ui: &mut dyn UserInterface,
    ) -> Result<Flow> {
        let next = controller.current_step().next();
        let mut spinner = next
            .filter(|s| s.is_asset() && !controller.store().has_content(*s))
            .map(|s| ui.start_spinner(&format!("Generating {}...", s.title())));

        match controller.advance(gateway) {
            Ok(advance) => {
                if let (Some(spinner), Some(id)) = (spinner.as_mut(), advance.generated) {
                    spinner.finish_success(&format!("{} ready ({})", advance.step.title(), id));
                }
                Ok(Flow::Continue)
            }
            Err(StagecraftError::GenerationFailed { step, message }) => {
                if let Some(spinner) = spinner.as_mut() {
                    spinner.finish_error(&format!("{} failed", step.title()));
                }
                ui.error(&format!("Generation failed: {}", message));
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    /// An asset step with no content, after a failed generation.
    fn recover(
        &self,
        controller: &mut PipelineController,
        gateway: &dyn GenerationGateway,
        ui: &mut dyn UserInterface,
    ) -> Result<Flow> {
        let step = controller.current_step();
        if !ui.is_interactive() {
            ui.error(&format!("No content for '{}'; stopping", step));
            return Ok(Flow::Done(CommandResult::failure(1)));
        }

        let answer = ui.prompt(
            &Prompt::new(
                "generation_action",
                format!("{} has no content. What next?", step.title()),
                PromptType::Select {
                    options: vec![
                        PromptOption::new("Retry generation", "retry"),
                        PromptOption::new("Go back", "back"),
                        PromptOption::new("Start over", "start-over"),
                        PromptOption::new("Quit", "quit"),
                    ],
                },
            )
            .with_default("retry"),
        )?;

        match answer.as_string().as_str() {
            "retry" => {
                let mut spinner = ui.start_spinner(&format!("Generating {}...", step.title()));
                match controller.generate(gateway) {
                    Ok(id) => spinner.finish_success(&format!("{} ready ({})", step.title(), id)),
                    Err(StagecraftError::GenerationFailed { message, .. }) => {
                        spinner.finish_error(&format!("{} failed", step.title()));
                        ui.error(&format!("Generation failed: {}", message));
                    }
                    Err(e) => return Err(e),
                }
            }
            "back" => {
                controller.back()?;
            }
            "start-over" => start_over(controller, ui),
            _ => return Ok(quit(ui)),
        }
        Ok(Flow::Continue)
    }

    fn review_asset(
        &self,
        controller: &mut PipelineController,
        gateway: &dyn GenerationGateway,
        ui: &mut dyn UserInterface,
    ) -> Result<Flow> {
        let step = controller.current_step();
        let current = controller.store().current(step).unwrap_or_default().to_string();
        ui.show_content(step.title(), &current);

        let next_label = match step.next() {
            Some(PipelineStep::Review) => "Continue to review",
            _ => "Continue",
        };
        let answer = ui.prompt(
            &Prompt::new(
                "step_action",
                format!("What would you like to do with the {}?", step.title()),
                PromptType::Select {
                    options: vec![
                        PromptOption::new(next_label, "next"),
                        PromptOption::new("Edit", "edit"),
                        PromptOption::new("Regenerate", "regenerate"),
                        PromptOption::new("Show history", "history"),
                        PromptOption::new("Compare with an earlier version", "compare"),
                        PromptOption::new("Restore an earlier version", "restore"),
                        PromptOption::new("Go back", "back"),
                        PromptOption::new("Start over", "start-over"),
                        PromptOption::new("Quit", "quit"),
                    ],
                },
            )
            .with_default("next"),
        )?;

        match answer.as_string().as_str() {
            "next" => return self.advance(controller, gateway, ui),
            "edit" => edit(controller, &current, ui)?,
            "regenerate" => self.regenerate(controller, gateway, ui)?,
            "history" => show_history(controller, ui),
            "compare" => compare(controller, ui)?,
            "restore" => restore(controller, ui)?,
            "back" => {
                controller.back()?;
            }
            "start-over" => start_over(controller, ui),
            "quit" => return Ok(quit(ui)),
            other => ui.warning(&format!("Unknown choice '{}'", other)),
        }
        Ok(Flow::Continue)
    }

    fn regenerate(
        &self,
        controller: &mut PipelineController,
        gateway: &dyn GenerationGateway,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let plan = controller.plan_regenerate()?;
        let confirmation = if !plan.requires_confirmation() || self.args.yes {
            Confirmation::Confirmed
        } else {
            let titles: Vec<_> = plan.populated.iter().map(|s| s.title()).collect();
            ui.warning(&format!(
                "Regenerating {} discards: {}",
                plan.step.title(),
                titles.join(", ")
            ));
            let answer = ui.prompt(
                &Prompt::new("confirm_regenerate", "Regenerate anyway?", PromptType::Confirm)
                    .with_default("no"),
            )?;
            Confirmation::from(answer.as_bool().unwrap_or(false))
        };

        if confirmation == Confirmation::Unconfirmed {
            ui.message("Regeneration cancelled");
            return Ok(());
        }

        let mut spinner = ui.start_spinner(&format!("Regenerating {}...", plan.step.title()));
        match controller.regenerate(gateway, confirmation) {
            Ok(id) => {
                spinner.finish_success(&format!("{} regenerated ({})", plan.step.title(), id));
                Ok(())
            }
            Err(StagecraftError::GenerationFailed { message, .. }) => {
                spinner.finish_error(&format!("{} failed", plan.step.title()));
                ui.error(&format!("Generation failed: {}", message));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn review_package(
        &self,
        controller: &mut PipelineController,
        config: &StagecraftConfig,
        format: ExportFormat,
        library: &dyn AssetLibrary,
        ui: &mut dyn UserInterface,
    ) -> Result<Flow> {
        let package = controller.package()?;
        for section in &package.sections {
            ui.show_content(&section.title, &section.content);
        }

        let answer = ui.prompt(
            &Prompt::new(
                "review_action",
                "Finish and export this package?",
                PromptType::Select {
                    options: vec![
                        PromptOption::new("Finish and export", "finish"),
                        PromptOption::new("Go back", "back"),
                        PromptOption::new("Start over", "start-over"),
                        PromptOption::new("Quit", "quit"),
                    ],
                },
            )
            .with_default("finish"),
        )?;

        match answer.as_string().as_str() {
            "finish" => {}
            "back" => {
                controller.back()?;
                return Ok(Flow::Continue);
            }
            "start-over" => {
                start_over(controller, ui);
                return Ok(Flow::Continue);
            }
            _ => return Ok(quit(ui)),
        }

        let path = self.args.output.clone().unwrap_or_else(|| {
            self.project_root
                .join(&config.export.directory)
                .join(suggested_file_name(&package, format))
        });
        // The session stays open until the export is on disk.
        if let Err(e) = write_to(&path, &package, format) {
            ui.error(&e.to_string());
            if ui.is_interactive() {
                return Ok(Flow::Continue);
            }
            return Ok(Flow::Done(CommandResult::failure(1)));
        }
        ui.success(&format!("Exported {} to {}", format, path.display()));

        let finalized = controller.finalize_package(package, library)?;

        match &finalized.entry {
            Some(entry) => ui.success(&format!("Saved to library as {}", entry.id)),
            None => ui.warning("Could not save the package to the library"),
        }
        Ok(Flow::Done(CommandResult::success()))
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) =
            load_checked_config(&self.project_root, self.config_override.as_deref(), ui)
        else {
            return Ok(CommandResult::failure(2));
        };

        let format = match self.export_format(&config) {
            Ok(format) => format,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
        };

        if let Err(e) = self.check_flags(&config) {
            ui.error(&e.to_string());
            return Ok(CommandResult::failure(2));
        }

        let configured_gateway;
        let gateway: &dyn GenerationGateway = match &self.gateway {
            Some(gateway) => gateway.as_ref(),
            None => match gateway::from_config(&config.gateway) {
                Ok(built) => {
                    configured_gateway = built;
                    configured_gateway.as_ref()
                }
                Err(e) => {
                    ui.error(&e.to_string());
                    return Ok(CommandResult::failure(2));
                }
            },
        };

        let configured_library;
        let library: &dyn AssetLibrary = match &self.library {
            Some(library) => library.as_ref(),
            None => {
                configured_library = JsonFileLibrary::new(self.project_root.join(&config.library.path));
                &configured_library
            }
        };

        debug!(root = %self.project_root.display(), %format, "Starting session");
        self.run_session(&config, format, gateway, library, ui)
    }
}

fn check_choice(field: &str, value: &str, choices: &[String]) -> Result<()> {
    if choices.iter().any(|c| c == value) {
        return Ok(());
    }
    Err(StagecraftError::ConfigValidationError {
        message: format!(
            "Unknown {} '{}' (expected one of: {})",
            field,
            value,
            choices.join(", ")
        ),
    })
}

fn choice_prompt(key: &str, question: &str, choices: &[String], current: Option<String>) -> Prompt {
    let default = current
        .or_else(|| choices.first().cloned())
        .unwrap_or_default();
    let options = choices.iter().map(|c| PromptOption::plain(c)).collect();
    Prompt::new(key, question, PromptType::Select { options }).with_default(default)
}

fn edit(controller: &mut PipelineController, current: &str, ui: &mut dyn UserInterface) -> Result<()> {
    let answer = ui.prompt(
        &Prompt::new("edit_content", "Edit the content", PromptType::Editor).with_default(current),
    )?;
    let edited = answer.as_string();
    if edited.trim_end() == current.trim_end() {
        ui.message("No changes");
        return Ok(());
    }

    match controller.edit(edited) {
        Ok(id) => ui.success(&format!("Saved {}", id)),
        Err(e @ StagecraftError::InvalidContent { .. }) => ui.warning(&e.to_string()),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn show_history(controller: &PipelineController, ui: &mut dyn UserInterface) {
    let step = controller.current_step();
    let current = controller.store().current_version(step).map(|v| v.id);
    for version in controller.store().history(step) {
        let marker = if Some(version.id) == current {
            " (current)"
        } else {
            ""
        };
        ui.message(&format!(
            "{:>4}  {:<12}  {}{}",
            version.id.to_string(),
            version.source.label(),
            version.timestamp.format("%Y-%m-%d %H:%M:%S"),
            marker
        ));
    }
}

/// Ask for one of the non-current versions; `None` when there are none.
fn pick_version(
    controller: &PipelineController,
    key: &str,
    question: &str,
    ui: &mut dyn UserInterface,
) -> Result<Option<VersionId>> {
    let step = controller.current_step();
    let current = controller.store().current_version(step).map(|v| v.id);
    let options: Vec<_> = controller
        .store()
        .history(step)
        .iter()
        .rev()
        .filter(|v| Some(v.id) != current)
        .map(|v| PromptOption::new(format!("{} ({})", v.id, v.source), v.id.to_string()))
        .collect();

    let Some(first) = options.first().map(|o| o.value.clone()) else {
        ui.message("No earlier versions");
        return Ok(None);
    };

    let answer = ui.prompt(
        &Prompt::new(key, question, PromptType::Select { options }).with_default(first),
    )?;
    match VersionId::from_str(&answer.as_string()) {
        Ok(id) => Ok(Some(id)),
        Err(message) => {
            ui.warning(&message);
            Ok(None)
        }
    }
}

fn compare(controller: &PipelineController, ui: &mut dyn UserInterface) -> Result<()> {
    let Some(version) = pick_version(controller, "compare_version", "Compare which version?", ui)?
    else {
        return Ok(());
    };
    let lines = controller
        .store()
        .diff_with_current(controller.current_step(), version)?;
    ui.show_diff(&lines);
    ui.message(&format!(
        "{} → current: {}",
        version,
        DiffStats::from_lines(&lines).summary()
    ));
    Ok(())
}

fn restore(controller: &mut PipelineController, ui: &mut dyn UserInterface) -> Result<()> {
    let Some(version) = pick_version(controller, "restore_version", "Restore which version?", ui)?
    else {
        return Ok(());
    };
    match controller.restore(version) {
        Ok(()) => ui.success(&format!("Restored {}", version)),
        Err(e @ StagecraftError::VersionNotFound { .. }) => ui.warning(&e.to_string()),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn start_over(controller: &mut PipelineController, ui: &mut dyn UserInterface) {
    controller.start_over();
    ui.message("Starting over");
}

fn quit(ui: &mut dyn UserInterface) -> Flow {
    ui.message("Session discarded");
    Flow::Done(CommandResult::success())
}
