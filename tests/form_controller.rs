mod common;

use common::{FakeEngine, write_file};
use pdf_squash::{
    compressor::Compressor,
    form::{FilePicker, FormController, FormState},
    preset::Preset,
};
use std::path::{Path, PathBuf};

struct FixedPicker(Option<PathBuf>);

impl FilePicker for FixedPicker {
    fn pick_pdf(&self, _start_dir: &Path) -> Option<PathBuf> {
        self.0.clone()
    }
}

fn controller(dir: &Path) -> FormController {
    FormController::with_paths(dir.to_path_buf(), dir.join("compressed.pdf"), 2, false)
}

#[test]
fn starts_idle_and_compress_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let mut form = controller(dir.path());
    assert_eq!(form.state(), FormState::Idle);
    assert!(form.begin_compress().is_none());

    let c = Compressor::new(FakeEngine::writing(1));
    assert!(!form.compress_blocking(&c));
    assert_eq!(c.engine().call_count(), 0);
    assert_eq!(form.state(), FormState::Idle);
}

#[test]
fn cancelled_dialog_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut form = controller(dir.path());
    assert!(!form.select_file(&FixedPicker(None)));
    assert_eq!(form.state(), FormState::Idle);
    assert!(form.selected().is_none());
}

#[test]
fn selecting_a_pdf_shows_path_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(dir.path(), "in.pdf", 2_000_000);
    let mut form = controller(dir.path());

    assert!(form.select_file(&FixedPicker(Some(pdf.clone()))));
    assert_eq!(form.state(), FormState::FileSelected);
    assert_eq!(form.selected(), Some(pdf.as_path()));
    assert_eq!(form.labels().selected_file, pdf.display().to_string());
    assert_eq!(form.labels().size, "2.00MB");
}

#[test]
fn rejected_selection_sets_status() {
    let dir = tempfile::tempdir().unwrap();
    let txt = write_file(dir.path(), "in.txt", 10);
    let mut form = controller(dir.path());

    assert!(!form.select_file(&FixedPicker(Some(txt))));
    assert_eq!(form.state(), FormState::Idle);
    assert!(!form.status().is_empty());
}

#[test]
fn full_round_updates_labels() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(dir.path(), "in.pdf", 2_000_000);
    let mut form = controller(dir.path());
    form.select_file(&FixedPicker(Some(pdf)));
    form.set_preset(4);

    let job = form.begin_compress().expect("job");
    assert_eq!(form.state(), FormState::Compressing);
    assert_eq!(job.preset, 4);
    assert_eq!(job.output, dir.path().join("compressed.pdf"));
    assert!(form.begin_compress().is_none(), "second click while busy");

    let c = Compressor::new(FakeEngine::writing(1_000_000));
    form.finish_compress(job.run(&c));
    assert_eq!(form.state(), FormState::Compressed);
    assert_eq!(form.labels().compressed_size, "1.00MB");
    assert_eq!(
        form.labels().compressed_location,
        dir.path().join("compressed.pdf").display().to_string()
    );
    assert_eq!(form.status(), "Compressed by 50%.");
}

#[test]
fn failure_returns_to_file_selected() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(dir.path(), "in.pdf", 100);
    let mut form = controller(dir.path());
    form.select_file(&FixedPicker(Some(pdf)));

    let c = Compressor::new(FakeEngine::failing());
    assert!(!form.compress_blocking(&c));
    assert_eq!(form.state(), FormState::FileSelected);
    assert!(form.status().starts_with("Compression failed"));
    assert!(form.labels().compressed_size.is_empty());
}

#[test]
fn new_selection_clears_previous_compressed_size() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(dir.path(), "one.pdf", 500);
    let second = write_file(dir.path(), "two.pdf", 700);
    let mut form = controller(dir.path());
    form.select_file(&FixedPicker(Some(first)));
    assert!(form.compress_blocking(&Compressor::new(FakeEngine::writing(100))));
    assert!(!form.labels().compressed_size.is_empty());

    form.select_file(&FixedPicker(Some(second.clone())));
    assert_eq!(form.state(), FormState::FileSelected);
    assert!(form.labels().compressed_size.is_empty());
    assert_eq!(form.selected(), Some(second.as_path()));
}

#[test]
fn spinner_clamps_to_known_presets() {
    let dir = tempfile::tempdir().unwrap();
    let mut form = controller(dir.path());
    form.set_preset(9);
    assert_eq!(form.preset_kind(), Preset::Screen);
    form.step_preset(-10);
    assert_eq!(form.preset(), 0);
    form.step_preset(1);
    assert_eq!(form.preset_kind(), Preset::Prepress);
}
