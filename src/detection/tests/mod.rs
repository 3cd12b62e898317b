//! Test suites for the heuristic detector
