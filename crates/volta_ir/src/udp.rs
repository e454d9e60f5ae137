//! State tables for user-defined primitives.
//!
//! A UDP's behavior arrives as truth-table rows over a symbolic alphabet:
//! the levels `0`, `1`, `x`; the concrete edges `r` (0→1), `R` (x→1),
//! `f` (1→0), `F` (x→0), `P` (0→x), `N` (1→x); and the wildcards `?`
//! (any level), `p` (any rising-class edge), `n` (any falling-class
//! edge), `_` (falling to a definite 0), `*` (any edge). Sequential rows
//! compile into a finite state machine keyed by the full input vector —
//! position 0 being the primitive's current output — while combinational
//! rows map an input vector straight to an output level.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use volta_common::{InternalError, VoltaResult};

const LEVELS: &str = "01x";
const EDGES: &str = "rRfFPN";
const EDGE_WILDCARDS: &str = "np_*";

/// Expands the first wildcard of `row` into its constituent symbols,
/// recursing until no wildcard remains. A row without wildcards expands
/// to itself.
///
/// The expansion is a pure function of the row text, so the combinatorial
/// blow-up can be inspected without touching any table.
pub fn expand_row(row: &str) -> Vec<String> {
    let chars: Vec<char> = row.chars().collect();
    for (idx, c) in chars.iter().enumerate() {
        let subs: &[char] = match c {
            '?' => &['0', '1', 'x'],
            'n' => &['f', 'F', 'N'],
            'p' => &['r', 'R', 'P'],
            '_' => &['f', 'F'],
            '*' => &['r', 'R', 'f', 'F', 'P', 'N'],
            _ => continue,
        };
        let mut out = Vec::new();
        for &sub in subs {
            let mut next = chars.clone();
            next[idx] = sub;
            let next: String = next.into_iter().collect();
            out.extend(expand_row(&next));
        }
        return out;
    }
    vec![row.to_string()]
}

/// Per-pin successor slots of one state, keyed by the level the pin
/// transitions to.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct PinEdges {
    zer: Option<String>,
    one: Option<String>,
    xxx: Option<String>,
}

impl PinEdges {
    fn slot_mut(&mut self, level: char) -> &mut Option<String> {
        match level {
            '0' => &mut self.zer,
            '1' => &mut self.one,
            'x' => &mut self.xxx,
            _ => panic!("`{level}` is not a destination level"),
        }
    }

    fn slot(&self, level: char) -> &Option<String> {
        match level {
            '0' => &self.zer,
            '1' => &self.one,
            'x' => &self.xxx,
            _ => panic!("`{level}` is not a destination level"),
        }
    }

    fn is_empty(&self) -> bool {
        self.zer.is_none() && self.one.is_none() && self.xxx.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct State {
    out: char,
    pins: Vec<PinEdges>,
}

/// The compiled behavior table of one user-defined primitive.
///
/// Sequential tables are a state machine over full input-vector strings;
/// combinational tables are a direct row map. Lookups that find nothing
/// answer `x` — absence is a normal "unknown", never a failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UdpTable {
    pins: u32,
    sequential: bool,
    init: char,
    fsm: HashMap<String, State>,
    comb: HashMap<String, char>,
}

impl UdpTable {
    /// Creates an empty table for a primitive with `pins` pins (pin 0 is
    /// the output).
    pub fn new(pins: u32, sequential: bool) -> Self {
        assert!(pins >= 2, "a primitive needs an output and an input pin");
        Self {
            pins,
            sequential,
            init: 'x',
            fsm: HashMap::new(),
            comb: HashMap::new(),
        }
    }

    /// The pin count of the primitive this table describes.
    pub fn pin_count(&self) -> u32 {
        self.pins
    }

    /// Returns `true` for a sequential (state-holding) primitive.
    pub fn is_sequential(&self) -> bool {
        self.sequential
    }

    /// The declared initial output value.
    pub fn init(&self) -> char {
        self.init
    }

    /// Declares the initial output value of a sequential primitive.
    ///
    /// # Panics
    ///
    /// Panics on a combinational table or a value outside `{0,1,x}`.
    pub fn set_initial(&mut self, val: char) {
        assert!(
            self.sequential,
            "initial value on a combinational primitive"
        );
        assert!(
            matches!(val, '0' | '1' | 'x'),
            "`{val}` is not a valid initial value"
        );
        self.init = val;
    }

    /// Compiles one source row into the table.
    ///
    /// For a sequential primitive the row covers every pin (position 0 is
    /// the current output) and must specify exactly one edge, possibly
    /// through a wildcard; the declared output may be `-` to keep the
    /// current output. For a combinational primitive the row covers the
    /// input pins only and allows levels and `?`.
    ///
    /// Malformed rows — wrong length, foreign characters, missing or
    /// surplus edges, bad output — are rejected as errors the front end
    /// was required to catch. Rows that *conflict* with already-compiled
    /// rows are a fatal table-definition inconsistency.
    pub fn set_table(&mut self, input: &str, output: char) -> VoltaResult<()> {
        match output {
            '0' | '1' => {}
            '-' if self.sequential => {}
            _ => {
                return Err(InternalError::new(format!(
                    "`{output}` is not a valid primitive output"
                )))
            }
        }

        if self.sequential {
            if input.len() != self.pins as usize {
                return Err(InternalError::new(format!(
                    "sequential row `{input}` must cover all {} pins",
                    self.pins
                )));
            }
            let mut edges = 0usize;
            for c in input.chars() {
                if EDGES.contains(c) || EDGE_WILDCARDS.contains(c) {
                    edges += 1;
                } else if !LEVELS.contains(c) && c != '?' {
                    return Err(InternalError::new(format!(
                        "`{c}` is not a valid sequential row symbol"
                    )));
                }
            }
            if edges != 1 {
                return Err(InternalError::new(format!(
                    "sequential row `{input}` must specify exactly one edge"
                )));
            }
            for row in expand_row(input) {
                self.set_sequ(&row, output);
            }
        } else {
            if input.len() != (self.pins - 1) as usize {
                return Err(InternalError::new(format!(
                    "combinational row `{input}` must cover {} input pins",
                    self.pins - 1
                )));
            }
            for c in input.chars() {
                if !LEVELS.contains(c) && c != '?' {
                    return Err(InternalError::new(format!(
                        "`{c}` is not a valid combinational row symbol"
                    )));
                }
            }
            for row in expand_row(input) {
                self.comb.insert(row, output);
            }
        }
        Ok(())
    }

    /// Compiles one concrete sequential row: derive the from/to state
    /// strings around the row's single edge and record the transition.
    fn set_sequ(&mut self, input: &str, output: char) {
        let output = if output == '-' {
            input.chars().next().expect("row cannot be empty")
        } else {
            output
        };

        let mut frm: Vec<char> = input.chars().collect();
        let mut to = frm.clone();
        to[0] = output;

        let edge = frm
            .iter()
            .position(|c| !LEVELS.contains(*c))
            .expect("concrete row must contain an edge");

        match frm[edge] {
            'r' => {
                frm[edge] = '0';
                to[edge] = '1';
            }
            'R' => {
                frm[edge] = 'x';
                to[edge] = '1';
            }
            'f' => {
                frm[edge] = '1';
                to[edge] = '0';
            }
            'F' => {
                frm[edge] = 'x';
                to[edge] = '0';
            }
            'P' => {
                frm[edge] = '0';
                to[edge] = 'x';
            }
            'N' => {
                frm[edge] = '1';
                to[edge] = 'x';
            }
            other => panic!("`{other}` is not an edge symbol"),
        }

        let dest_level = to[edge];
        let frm_key: String = frm.into_iter().collect();
        let to_key: String = to.into_iter().collect();

        self.ensure_state(&frm_key);
        self.ensure_state(&to_key);

        let pins = &mut self
            .fsm
            .get_mut(&frm_key)
            .expect("from-state was just created")
            .pins;
        let slot = pins[edge].slot_mut(dest_level);
        // The same transition may be produced by overlapping rows; a
        // *different* target for the same (state, pin, level) triple
        // means the source table contradicts itself.
        if slot.as_deref() != Some(to_key.as_str()) {
            assert!(
                slot.is_none(),
                "conflicting rows for state `{frm_key}` pin {edge} level `{dest_level}`"
            );
            *slot = Some(to_key);
        }
    }

    fn ensure_state(&mut self, key: &str) {
        if !self.fsm.contains_key(key) {
            let out = key.chars().next().expect("state key cannot be empty");
            self.fsm.insert(
                key.to_string(),
                State {
                    out,
                    pins: vec![PinEdges::default(); self.pins as usize],
                },
            );
        }
    }

    /// Prunes the compiled state machine.
    ///
    /// First, transitions into a state whose committed output is `x` are
    /// cleared (an unknown-output state conveys nothing). Second, states
    /// with output `x` and no surviving outgoing transition are removed.
    pub fn cleanup_table(&mut self) {
        let x_states: Vec<String> = self
            .fsm
            .iter()
            .filter(|(_, state)| state.out == 'x')
            .map(|(key, _)| key.clone())
            .collect();

        for state in self.fsm.values_mut() {
            for pin in &mut state.pins {
                for slot in [&mut pin.zer, &mut pin.one, &mut pin.xxx] {
                    if slot.as_deref().is_some_and(|t| x_states.iter().any(|k| k == t)) {
                        *slot = None;
                    }
                }
            }
        }

        self.fsm
            .retain(|_, state| state.out != 'x' || state.pins.iter().any(|p| !p.is_empty()));
    }

    /// Looks up the output after pin `pin` of state `from` transitions to
    /// level `to`. Answers `x` when no matching state or transition is
    /// recorded.
    ///
    /// # Panics
    ///
    /// Panics on a malformed query: wrong state-string length, pin out of
    /// range, or a destination outside `{0,1,x}`.
    pub fn table_lookup(&self, from: &str, to: char, pin: u32) -> char {
        assert!(pin < self.pins, "pin {pin} out of range");
        assert!(
            from.len() == self.pins as usize,
            "state `{from}` does not cover all {} pins",
            self.pins
        );
        let Some(state) = self.fsm.get(from) else {
            return 'x';
        };
        match state.pins[pin as usize].slot(to) {
            Some(target) => self.fsm.get(target).map(|s| s.out).unwrap_or('x'),
            None => 'x',
        }
    }

    /// Looks up a combinational row, answering `x` when none matches.
    pub fn comb_lookup(&self, input: &str) -> char {
        self.comb.get(input).copied().unwrap_or('x')
    }

    /// The number of states currently in the sequential table.
    pub fn state_count(&self) -> usize {
        self.fsm.len()
    }

    /// Iterates over the state keys of the sequential table.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.fsm.keys().map(String::as_str)
    }
}
