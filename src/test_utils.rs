use crate::{
    check_cell_type, execute,
    ir::{statements, Recording, Statement},
    settings::Settings,
    tape::GrowableTape,
    translate, ExecuteCallbackResult, ExecutionError, TranslateError,
};

/// Number of statements executed before a test run is aborted.
const STEP_LIMIT: usize = 500000;

#[derive(Debug, PartialEq)]
pub struct ExecutionState {
    pub result: Option<Result<(), ExecutionError>>,
    pub tape: Option<GrowableTape>,
    pub output: Vec<u8>,
}

/// Translate a source and keep only the statements.
pub fn record(source: &[u8], settings: &Settings) -> Result<Vec<Statement>, TranslateError> {
    let (events, _) = translate(source, Recording::new(), settings)?;
    Ok(statements(&events))
}

pub fn compare_runs(exec1: &ExecutionState, exec2: &ExecutionState) {
    match (
        exec1.result.as_ref().unwrap(),
        exec2.result.as_ref().unwrap(),
    ) {
        (Ok(_), Ok(_)) => {
            assert_eq!(exec1.output, exec2.output);
        }
        // Coalesced code runs fewer statements, so it may get further
        // before hitting the step limit.
        (Err(ExecutionError::Aborted), _) | (_, Err(ExecutionError::Aborted)) => {
            let n = std::cmp::min(exec1.output.len(), exec2.output.len());
            assert_eq!(exec1.output[..n], exec2.output[..n]);
        }
        (Err(_), Err(_)) => {
            assert_eq!(exec1.result, exec2.result);
            assert_eq!(exec1.output, exec2.output);
        }
        (Ok(_), Err(err)) | (Err(err), Ok(_)) => {
            panic!("Only one run failed: {err:?}");
        }
    }
}

pub fn test_execute(
    code: &[Statement],
    settings: &Settings,
    input: &mut impl std::io::Read,
) -> ExecutionState {
    if let Err(err) = check_cell_type(settings) {
        return ExecutionState {
            result: Some(Err(err)),
            tape: None,
            output: vec![],
        };
    }
    let mut tape = match GrowableTape::new(settings.init_size, settings.extend_size) {
        Ok(tape) => tape,
        Err(err) => {
            return ExecutionState {
                result: Some(Err(err.into())),
                tape: None,
                output: vec![],
            }
        }
    };
    let mut steps = 0;
    let mut output = vec![];
    let result = execute(code, &mut tape, input, &mut output, &mut |_, _| {
        steps += 1;
        if steps > STEP_LIMIT {
            ExecuteCallbackResult::Abort
        } else {
            ExecuteCallbackResult::Continue
        }
    });

    ExecutionState {
        result: Some(result),
        tape: Some(tape),
        output,
    }
}
