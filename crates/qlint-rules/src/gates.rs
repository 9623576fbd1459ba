//! Gate and backend name tables shared by the checkers.

/// Backends a simulator construction call may name.
pub const VALID_BACKENDS: &[&str] = &["mqvector", "mqvector_gpu", "mqmatrix"];

/// Gates applied through bare calls carrying qubit indices directly,
/// e.g. `h(0)` or `swap(1, 2)`.
pub const BARE_GATES: &[&str] = &[
    "h", "x", "y", "z", "s", "t", "sx", "swap", "iswap", "cnot",
];

/// Multi-qubit / controlled gate names. A register of size 1 cannot host
/// any of these.
pub const CONTROLLED_GATES: &[&str] = &[
    "cs", "ch", "cx", "cnot", "cp", "mcp", "rcx", "rccx", "rcccx", "crx", "cry", "crz", "csdg",
    "cswap", "csx", "cu", "ccx", "mcx", "cy", "cz", "ccz",
];

pub fn is_valid_backend(name: &str) -> bool {
    VALID_BACKENDS.contains(&name)
}

pub fn is_bare_gate(name: &str) -> bool {
    BARE_GATES.contains(&name)
}

pub fn is_controlled_gate(name: &str) -> bool {
    CONTROLLED_GATES.contains(&name)
}

/// Gate names whose second argument group names control qubits; the
/// measurement checker inspects these for measured controls.
pub fn takes_control_argument(name: &str) -> bool {
    is_bare_gate(name) || is_controlled_gate(name)
}
