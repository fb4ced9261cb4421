//! Runs every program in the programs directory through the translator and
//! the reference interpreter, under a range of settings.

use std::{collections::VecDeque, env, error::Error, path::PathBuf};

use bf2c::{
    settings::Settings,
    ExecutionError,
    test_utils::{compare_runs, record, test_execute},
};

fn find_programs() -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut path: PathBuf = env::var("CARGO_MANIFEST_DIR")?.into();
    path.push("tests");
    path.push("programs");

    let mut results = vec![];
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some("bf") = path.extension().and_then(|x| x.to_str()) {
            results.push(path);
        }
    }
    results.sort();
    Ok(results)
}

/// Every combination of flags, with tape sizes small enough to force
/// plenty of growth.
fn settings_grid() -> Vec<Settings> {
    let mut grid = vec![];
    for (init_size, extend_size) in [(1024, 1024), (1, 1), (4, 4), (3, 5)] {
        for coalesce in [false, true] {
            for comments in [false, true] {
                grid.push(Settings {
                    init_size,
                    extend_size,
                    coalesce,
                    comments,
                    ..Default::default()
                });
            }
        }
    }
    grid
}

fn run_program(
    program: &PathBuf,
    input: Option<PathBuf>,
    expected_output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let src = std::fs::read(program)?;
    let out = std::fs::read(expected_output)?;
    let input: VecDeque<_> = match input {
        Some(f) => std::fs::read(f)?.into(),
        None => VecDeque::new(),
    };

    let plain = record(&src, &Settings::default())?;
    let reference = test_execute(&plain, &Settings::default(), &mut input.clone());
    assert_eq!(reference.result, Some(Ok(())));
    assert_eq!(reference.output, out);

    for settings in settings_grid() {
        let code = record(&src, &settings)?;
        let exec = test_execute(&code, &settings, &mut input.clone());
        assert_eq!(exec.result, Some(Ok(())), "{settings:?}");
        assert_eq!(exec.output, out, "{settings:?}");
        compare_runs(&reference, &exec);
    }

    Ok(())
}

#[test]
fn test_programs() {
    let programs = find_programs().unwrap();
    assert!(!programs.is_empty());
    for program in programs {
        let in_file = program.with_extension("in");
        let in_file = if in_file.exists() {
            Some(in_file)
        } else {
            None
        };
        let out_file = program.with_extension("out");
        match run_program(&program, in_file, out_file) {
            Ok(_) => (),
            Err(err) => panic!("{err:?} {program:?}"),
        }
    }
}

#[test]
fn test_coalescing_shrinks_code() {
    let src = b"++++++++[>++++<-]>>>>><<<<<.";
    let plain = record(src, &Settings::default()).unwrap();
    let merged = record(
        src,
        &Settings {
            coalesce: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(plain.len(), 28);
    assert_eq!(merged.len(), 9);
}

#[test]
fn test_wide_cells_not_interpreted() {
    // An int cell holds 256 after the first run, so compiled C prints 49
    // while an 8-bit model would skip the loop.
    let mut src = vec![b'+'; 256];
    src.extend_from_slice(b"[>");
    src.extend(std::iter::repeat(b'+').take(49));
    src.extend_from_slice(b".<[-]]");
    let settings = Settings {
        cell_type: "int".into(),
        ..Default::default()
    };
    let code = record(&src, &settings).unwrap();
    let exec = test_execute(&code, &settings, &mut VecDeque::new());
    assert_eq!(
        exec.result,
        Some(Err(ExecutionError::UnsupportedCellType("int".into())))
    );
    assert!(exec.output.is_empty());

    let exec = test_execute(&code, &Settings::default(), &mut VecDeque::new());
    assert_eq!(exec.result, Some(Ok(())));
    assert!(exec.output.is_empty());
}
