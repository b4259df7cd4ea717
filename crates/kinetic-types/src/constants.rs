// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Avogadro constant (1/mol)
pub const N_AVOGADRO: f64 = 6.02214076e23;

/// Molar gas constant (J/(mol K))
pub const R_GAS: f64 = 8.314462618;

/// One standard atmosphere (Pa)
pub const ATM_TO_PASCAL: f64 = 101_325.0;

/// One Townsend (V m^2)
pub const TOWNSEND: f64 = 1.0e-21;

/// Relative mass tolerance for kd-tree splits.
pub const MASS_TOLERANCE: f64 = 1.0e-9;

/// Neutral number density (1/m^3) of an ideal gas at pressure `p_pa` and temperature `t_k`.
pub fn neutral_density(p_pa: f64, t_k: f64) -> f64 {
    p_pa * N_AVOGADRO / (t_k * R_GAS)
}
