use pdf_squash::{
    compressor::Compressor,
    config::Config,
    engine::{Engine, ghostscript::GhostscriptEngine},
};

// Smallest well-formed single-page PDF; xref offsets are exact.
const MINIMAL_PDF: &str = "%PDF-1.4\n\
1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n\
3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 200] >>\nendobj\n\
xref\n0 4\n\
0000000000 65535 f \n\
0000000009 00000 n \n\
0000000058 00000 n \n\
0000000115 00000 n \n\
trailer\n<< /Size 4 /Root 1 0 R >>\nstartxref\n186\n%%EOF\n";

#[test]
fn screen_preset_with_real_ghostscript() {
    let Ok(engine) = GhostscriptEngine::new(&Config::default()) else {
        eprintln!("ghostscript not installed; skipping");
        return;
    };
    if !engine.doctor().map(|d| d.ok).unwrap_or(false) {
        eprintln!("ghostscript not usable; skipping");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.pdf");
    std::fs::write(&input, MINIMAL_PDF).unwrap();
    let output = dir.path().join("tiny-screen.pdf");

    let report = Compressor::new(engine)
        .compress(&input, &output, 4, false)
        .expect("ghostscript run");

    assert!(output.is_file());
    assert!(report.output_bytes > 0);
    // Already-minimal inputs can grow; only the bookkeeping must agree.
    let expected = 1.0 - report.output_bytes as f64 / report.input_bytes as f64;
    assert!((report.ratio() - expected).abs() < 1e-12);
}
