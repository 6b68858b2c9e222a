//! Line-driven statement machine: the generic driver plus the plugin contract.

use std::fmt::Debug;

use crate::error::DriveError;
use crate::options::ParseOptions;

/// One statement format's extraction logic.
///
/// `transition` must be total and keep the terminal state absorbing. `action`
/// owns everything format-specific: row matching, date parsing, multi-line
/// joining, income/expense classification. Both see the resolved options on
/// every call, and any multi-line carry they maintain must live in the
/// accumulator so it is scoped to one `run` call.
pub trait FormatPlugin {
    /// Closed per-format state set; exhaustively matchable.
    type State: Copy + Eq + Debug;
    /// Accumulator shape this format produces.
    type Output;

    fn initial_state(&self) -> Self::State;
    fn terminal_state(&self) -> Self::State;

    /// Pure: given the current state and the line just read, the state to
    /// move to.
    fn transition(&self, state: Self::State, line: &str, options: &ParseOptions) -> Self::State;

    /// Update the accumulator from the line under the *current* state.
    fn action(
        &self,
        state: Self::State,
        line: &str,
        acc: &mut Self::Output,
        options: &ParseOptions,
    ) -> anyhow::Result<()>;

    /// Literal substrings this format expects somewhere in a real statement.
    /// Trace fast-path only; never required for correctness.
    fn keywords(&self) -> &[&str] {
        &[]
    }
}

/// Walk the reconstructed lines once, in order, through `plugin`.
///
/// Moore-style with side-effecting output: for each line, `action` runs under
/// the current state first, then `transition` computes the next state. The
/// machine never looks ahead or behind the current line. Reaching the
/// terminal state does not stop consumption, since trailing footer lines may
/// still carry account info; the plugin keeps that state absorbing instead.
///
/// The final accumulator is returned whatever state was reached; an empty
/// line sequence returns `initial` untouched. A plugin failure aborts the
/// parse with the line index and state attached, never a partial accumulator.
pub fn run<P: FormatPlugin>(
    lines: &[String],
    plugin: &P,
    options: &ParseOptions,
    initial: P::Output,
) -> Result<P::Output, DriveError> {
    let mut state = plugin.initial_state();
    let mut acc = initial;

    for (line_no, line) in lines.iter().enumerate() {
        if options.trace {
            if let Some(hit) = plugin.keywords().iter().copied().find(|kw| line.contains(*kw)) {
                log::trace!("line {line_no}: keyword {hit:?}");
            }
        }

        plugin
            .action(state, line, &mut acc, options)
            .map_err(|source| DriveError::PluginLogic {
                line_no,
                state: format!("{state:?}"),
                source,
            })?;

        let next = plugin.transition(state, line, options);
        if options.trace {
            log::debug!("line {line_no}: {state:?} -> {next:?}: {line}");
        }
        state = next;
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ToyState {
        Waiting,
        Counting,
        Done,
    }

    /// Records which state each line was processed under.
    struct ToyPlugin;

    impl FormatPlugin for ToyPlugin {
        type State = ToyState;
        type Output = Vec<String>;

        fn initial_state(&self) -> ToyState {
            ToyState::Waiting
        }

        fn terminal_state(&self) -> ToyState {
            ToyState::Done
        }

        fn transition(&self, state: ToyState, line: &str, _options: &ParseOptions) -> ToyState {
            match state {
                ToyState::Waiting if line == "BEGIN" => ToyState::Counting,
                ToyState::Counting if line == "END" => ToyState::Done,
                other => other,
            }
        }

        fn action(
            &self,
            state: ToyState,
            line: &str,
            acc: &mut Vec<String>,
            _options: &ParseOptions,
        ) -> anyhow::Result<()> {
            if line == "BOOM" {
                anyhow::bail!("unparseable line");
            }
            acc.push(format!("{state:?}:{line}"));
            Ok(())
        }

        fn keywords(&self) -> &[&str] {
            &["BEGIN", "END"]
        }
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_action_sees_current_state_before_transition() {
        let seen = run(
            &lines(&["BEGIN", "row", "END", "footer"]),
            &ToyPlugin,
            &ParseOptions::default(),
            Vec::new(),
        )
        .unwrap();

        // "BEGIN" itself is processed under Waiting, and the terminal state
        // keeps consuming trailing lines.
        assert_eq!(
            seen,
            vec!["Waiting:BEGIN", "Counting:row", "Counting:END", "Done:footer"]
        );
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        let opts = ParseOptions::default();
        for line in ["BEGIN", "END", "01 JAN 2024 anything", ""] {
            assert_eq!(ToyPlugin.transition(ToyState::Done, line, &opts), ToyState::Done);
        }
    }

    #[test]
    fn test_empty_input_returns_initial_accumulator() {
        let out = run(&[], &ToyPlugin, &ParseOptions::default(), Vec::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_plugin_failure_aborts_with_line_and_state() {
        let err = run(
            &lines(&["BEGIN", "BOOM"]),
            &ToyPlugin,
            &ParseOptions::default(),
            Vec::new(),
        )
        .unwrap_err();

        let DriveError::PluginLogic { line_no, state, .. } = err;
        assert_eq!(line_no, 1);
        assert_eq!(state, "Counting");
    }

    #[test]
    fn test_same_input_yields_identical_output() {
        let input = lines(&["BEGIN", "a", "b", "END"]);
        let opts = ParseOptions::default();

        let first = run(&input, &ToyPlugin, &opts, Vec::new()).unwrap();
        let second = run(&input, &ToyPlugin, &opts, Vec::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trace_mode_does_not_change_output() {
        let input = lines(&["BEGIN", "a", "END"]);

        let quiet = run(&input, &ToyPlugin, &ParseOptions::default(), Vec::new()).unwrap();
        let traced = run(
            &input,
            &ToyPlugin,
            &ParseOptions::default().with_trace(true),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(quiet, traced);
    }
}
