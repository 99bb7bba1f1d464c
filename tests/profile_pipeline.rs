//! Integration tests: plotfile sequences + profile pipeline

use approx::assert_relative_eq;
use castro_plots::prelude::*;
use tempfile::{tempdir, TempDir};

mod common;
use common::{write_plotfile, PlotfileLayout};

/// Write a 1D detonation plotfile per step, with time = step / 1000 s
fn detonation_run(steps: &[u64]) -> (TempDir, Vec<String>) {
    let dir = tempdir().unwrap();
    let mut names = Vec::with_capacity(steps.len());

    for &step in steps {
        let time = step as f64 / 1000.0;
        let front = 10.0 + 50.0 * time;
        let temp = move |p: [f64; 3]| if p[0] < front { 3.0e9 } else { 1.0e8 };
        let enuc = move |p: [f64; 3]| 1.0e18 * (-(p[0] - front).powi(2)).exp();

        let mut layout = PlotfileLayout::one_d(64, 64.0, time);
        layout.step = step;
        layout.grids = 2;
        let path = write_plotfile(
            dir.path(),
            &format!("det_plt{:05}", step),
            &layout,
            &[("Temp", &temp), ("enuc", &enuc)],
        );
        names.push(path.display().to_string());
    }
    (dir, names)
}

fn curve_times(figure: &ProfileFigure) -> Vec<f64> {
    figure.curves().iter().map(|c| c.sample.time).collect()
}

#[test]
fn test_profiles_written_in_step_order() {
    let (_run, mut names) = detonation_run(&[0, 10, 20, 30]);
    names.reverse();
    let out = tempdir().unwrap();
    let output = out.path().join("det.png");

    let figure = run_profiles(&names, &ProfileOptions::default(), &output).unwrap();

    assert!(output.exists());
    assert_eq!(figure.curve_count(), 4);
    let times = curve_times(&figure);
    for (t, expected) in times.iter().zip([0.0, 0.01, 0.02, 0.03]) {
        assert_relative_eq!(*t, expected, max_relative = 1e-12);
    }
    // Default label limit labels every curve
    assert!(figure.curves().iter().all(|c| c.label.is_some()));
}

#[test]
fn test_profile_samples_sorted_along_x() {
    let (_run, names) = detonation_run(&[0]);
    let out = tempdir().unwrap();

    let figure = run_profiles(&names, &ProfileOptions::default(), out.path().join("det.png")).unwrap();
    let sample = &figure.curves()[0].sample;

    assert_eq!(sample.x.len(), 64);
    assert!(sample.x.windows(2).all(|w| w[0] < w[1]));
    assert_relative_eq!(sample.x[0], 0.5);
    // Burned behind the front at x = 10
    assert_relative_eq!(sample.temperature[0], 3.0e9);
    assert_relative_eq!(sample.temperature[63], 1.0e8);
}

#[test]
fn test_profiles_skip_and_clip() {
    let (_run, names) = detonation_run(&[0, 10, 20, 30, 40]);
    let out = tempdir().unwrap();
    let options = ProfileOptions {
        skip: 2,
        xmin: 5.0,
        xmax: 40.0,
        ..ProfileOptions::default()
    };

    let figure = run_profiles(&names, &options, out.path().join("det.png")).unwrap();

    assert_eq!(figure.curve_count(), 3);
    let times = curve_times(&figure);
    assert_relative_eq!(times[2], 0.04, max_relative = 1e-12);
    assert_eq!(figure.xlim(), Some((5.0, 40.0)));
}

#[test]
fn test_empty_sequence_still_writes_figure() {
    let out = tempdir().unwrap();
    let output = out.path().join("det.png");
    let names: [&str; 0] = [];

    let figure = run_profiles(&names, &ProfileOptions::default(), &output).unwrap();

    assert_eq!(figure.curve_count(), 0);
    assert!(output.exists());
}

#[test]
fn test_negative_label_limit_rejected_before_output() {
    let (_run, names) = detonation_run(&[0, 10]);
    let out = tempdir().unwrap();
    let output = out.path().join("det.png");
    let options = ProfileOptions {
        limit_labels: -1.0,
        ..ProfileOptions::default()
    };

    let result = run_profiles(&names, &options, &output);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(!output.exists());
}

#[test]
fn test_name_without_plt_rejected() {
    let out = tempdir().unwrap();
    let output = out.path().join("det.png");

    let result = run_profiles(&["checkpoint00100"], &ProfileOptions::default(), &output);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(!output.exists());
}

#[test]
fn test_missing_plotfile_aborts_run() {
    let (run, mut names) = detonation_run(&[0, 10]);
    names.push(run.path().join("det_plt00020").display().to_string());
    let out = tempdir().unwrap();
    let output = out.path().join("det.png");

    let result = run_profiles(&names, &ProfileOptions::default(), &output);

    assert!(matches!(result, Err(Error::Load { .. })));
    assert!(!output.exists());
}
