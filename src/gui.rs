use crate::{
    compressor::Compressor,
    config::Config,
    engine::ghostscript::GhostscriptEngine,
    form::{CompressJob, FilePicker, FormController, FormState},
    report::CompressionReport,
};
use anyhow::{Result, anyhow};
use iced::widget::{button, checkbox, column, container, row, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Native open dialog limited to PDFs.
pub struct RfdPicker;

impl FilePicker for RfdPicker {
    fn pick_pdf(&self, start_dir: &Path) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Select a PDF to compress")
            .set_directory(start_dir)
            .add_filter("PDF", &["pdf", "PDF"])
            .pick_file()
    }
}

struct SquashApp {
    form: FormController,
    compressor: Option<Arc<Compressor<GhostscriptEngine>>>,
}

#[derive(Debug, Clone)]
enum Message {
    Browse,
    Compress,
    PresetStep(i64),
    GrayscaleToggled(bool),
    CompressFinished(Result<CompressionReport, String>),
}

impl SquashApp {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Browse => {
                self.form.select_file(&RfdPicker);
                Task::none()
            }
            Message::Compress => {
                let Some(compressor) = self.compressor.clone() else {
                    return Task::none();
                };
                let Some(job) = self.form.begin_compress() else {
                    return Task::none();
                };
                Task::perform(run_job(compressor, job), Message::CompressFinished)
            }
            Message::PresetStep(delta) => {
                self.form.step_preset(delta);
                Task::none()
            }
            Message::GrayscaleToggled(on) => {
                self.form.set_grayscale(on);
                Task::none()
            }
            Message::CompressFinished(result) => {
                if let Err(e) = &result {
                    error!("compression failed: {e}");
                }
                self.form.finish_compress(result);
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let labels = self.form.labels();
        let preset = self.form.preset_kind();
        let busy = self.form.state() == FormState::Compressing;
        let can_compress = self.compressor.is_some() && self.form.can_compress();

        let content = column![
            text("PDF Squash").size(32),
            row![
                button("Browse...")
                    .on_press_maybe((!busy).then_some(Message::Browse))
                    .padding(10),
                text(&labels.selected_file),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            row![text("Size:"), text(&labels.size)].spacing(8),
            row![
                text("Preset:"),
                button("-").on_press(Message::PresetStep(-1)),
                text(format!("{} ({})", preset.index(), preset.name())),
                button("+").on_press(Message::PresetStep(1)),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            text(preset.description()).size(14),
            checkbox("Grayscale", self.form.grayscale()).on_toggle(Message::GrayscaleToggled),
            button("Compress")
                .on_press_maybe(can_compress.then_some(Message::Compress))
                .padding(10),
            row![text("Compressed size:"), text(&labels.compressed_size)].spacing(8),
            row![text("Saved to:"), text(&labels.compressed_location)].spacing(8),
            text(self.form.status()).size(14),
        ]
        .spacing(16)
        .padding(24);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Runs the engine on tokio's blocking pool so the window keeps repainting.
async fn run_job(
    compressor: Arc<Compressor<GhostscriptEngine>>,
    job: CompressJob,
) -> Result<CompressionReport, String> {
    let handle = tokio::task::spawn_blocking(move || job.run(&compressor).map_err(|e| e.to_string()));
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(format!("compression task failed: {e}")),
    }
}

pub fn run(cfg: &Config) -> Result<()> {
    let mut form = FormController::new(cfg);
    let compressor = match GhostscriptEngine::new(cfg) {
        Ok(engine) => {
            info!("gui using {}", engine.executable().display());
            Some(Arc::new(Compressor::new(engine)))
        }
        Err(e) => {
            error!("{e}");
            form.set_status(e.to_string());
            None
        }
    };
    info!("gui output file: {}", form.output_path().display());

    iced::application("PDF Squash", SquashApp::update, SquashApp::view)
        .theme(SquashApp::theme)
        .centered()
        .run_with(move || (SquashApp { form, compressor }, Task::none()))
        .map_err(|e| anyhow!("gui failed: {e}"))
}
