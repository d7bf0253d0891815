/// Table, column and symbol names for gut-balance.
/// Single source of truth - exported to Python via PyO3.

/// Unit tag carried by every flux row.
pub const UNITS_GCOD_PER_DAY: &str = "gCOD/d";

// ── Input table layout ──────────────────────────────────────────────────────
pub mod input {
    pub const SYMBOL: &str = "Symbol";
    pub const VALUE: &str = "Value";
    pub const COMPOUND: &str = "Compound";
    pub const GCOD_PER_GRAM: &str = "gCOD/g";
    pub const ENTHALPY_OF_COMBUSTION: &str = "Enthalpy of Combustion";

    pub const PARAMETERS_FILE: &str = "Parameters.csv";
    pub const DIET_FILE: &str = "Dietary Input.csv";
    pub const COMPONENTS_FILE: &str = "Components.csv";
}

// ── Parameter symbols ───────────────────────────────────────────────────────
pub mod parameter {
    pub const A_AVSS: &str = "aAvSS";
    pub const B_AVSS: &str = "bAvSS";
    pub const ARL_AVSS: &str = "ARL_AvSS";
    pub const A_PROTEIN: &str = "aprotein";
    pub const B_PROTEIN: &str = "bprotein";
    pub const ARL_PROTEIN: &str = "ARL_protein";
    pub const A_FAT: &str = "afat";
    pub const B_FAT: &str = "bfat";
    pub const ARL_FAT: &str = "ARL_fat";
    pub const SIR: &str = "SIR";

    pub const GIS_CARB: &str = "GIS_carb";
    pub const GIS_PROTEIN: &str = "GIS_protein";
    pub const GIS_FAT: &str = "GIS_fat";

    pub const Q: &str = "q";
    pub const KHYD_NSP: &str = "khyd_NSP";
    pub const KHYD_RS: &str = "khyd_RS";
    pub const KHYD_P: &str = "khyd_P";
    pub const KABS_F: &str = "kabs_F";

    pub const FS0_C: &str = "fs0_C";
    pub const FS0_P: &str = "fs0_P";
    pub const FA_AC_C: &str = "fa(Ac)_C";
    pub const FA_PR_C: &str = "fa(Pr)_C";
    pub const FA_BU_C: &str = "fa(Bu)_C";
    pub const FA_AC_P: &str = "fa(Ac)_P";
    pub const FA_PR_P: &str = "fa(Pr)_P";
    pub const FA_BU_P: &str = "fa(Bu)_P";
    pub const FA_ARO_P: &str = "fa(Aro)_P";

    // Optional; defaults below apply when absent.
    pub const FABS_SCFA: &str = "fabs_SCFA";
    pub const FABS_ARO: &str = "fabs_Aro";

    pub const DEFAULT_FABS_SCFA: f64 = 0.95;
    pub const DEFAULT_FABS_ARO: f64 = 0.0;
}

// ── Diet symbols ────────────────────────────────────────────────────────────
pub mod diet {
    pub const NSP: &str = "NSP";
    pub const RS: &str = "RS";
    pub const AVSS: &str = "AvSS";
    pub const PI: &str = "PI";
    pub const FI: &str = "FI";
    pub const CI: &str = "CI";
}

// ── Macronutrient classes (Components table rows) ───────────────────────────
pub mod compound {
    pub const CARBOHYDRATE: &str = "Carbohydrate";
    pub const PROTEIN: &str = "Protein";
    pub const FAT: &str = "Fat";
}

// ── Upper-tract output columns ──────────────────────────────────────────────
pub mod upper {
    pub const COMPONENT: &str = "Component";
    pub const DIET_INPUT: &str = "Diet_Input";
    pub const UGI_ABSORPTION: &str = "UGI_Absorption";
    pub const ILEOCECAL_PASSAGE: &str = "Ileocecal_Passage";
    pub const UNITS: &str = "Units";
}

// ── Lower-tract output columns ──────────────────────────────────────────────
pub mod lower {
    pub const COMPONENT: &str = "Component";
    pub const ILEOCECAL_PASSAGE: &str = "Ileocecal_Passage";
    pub const LGI_ABSORPTION: &str = "LGI_Absorption";
    pub const FECAL_OUTPUT: &str = "Fecal Output";
    pub const MICROBIAL_PRODUCTION: &str = "Microbial_Production";
    pub const MICROBIAL_CONVERSION: &str = "Microbial_Conversion";
    pub const UNITS: &str = "Units";
}
