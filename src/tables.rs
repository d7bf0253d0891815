//! Input repository: CSV loading and conversion of the three symbol-keyed
//! input tables into typed structs.
//!
//! Lookups by symbol happen exactly once, here. Everything downstream works
//! on named struct fields.

use std::collections::HashMap;
use std::path::Path;

use polars::prelude::*;

use crate::error::GutError;
use crate::schema::{compound, diet, input, parameter};

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame, GutError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
        .into());
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    log::info!("Loaded {} rows from {:?}", df.height(), path);
    Ok(df)
}

/// Symbols are compared with all whitespace removed, so `fa (Ac)_C`
/// and `fa(Ac)_C` are the same key.
fn normalize_symbol(symbol: &str) -> String {
    symbol.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Symbol → value map read from one key column and one value column.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    table: &'static str,
    values: HashMap<String, f64>,
}

impl SymbolTable {
    /// Build from a DataFrame. String value cells are parsed after trimming;
    /// empty or unparseable cells become NaN so validation can catch them.
    /// When a key repeats, the first row wins.
    pub fn from_frame(
        table: &'static str,
        df: &DataFrame,
        key_col: &str,
        value_col: &str,
    ) -> Result<Self, GutError> {
        let keys = df
            .column(key_col)
            .map_err(|_| GutError::MissingColumn(format!("{table}.{key_col}")))?
            .cast(&DataType::String)?;
        let keys = keys.str()?;

        let raw = df
            .column(value_col)
            .map_err(|_| GutError::MissingColumn(format!("{table}.{value_col}")))?;

        let parsed: Vec<f64> = if raw.dtype() == &DataType::String {
            raw.str()?
                .into_iter()
                .map(|v| {
                    v.and_then(|s| s.trim().parse::<f64>().ok())
                        .unwrap_or(f64::NAN)
                })
                .collect()
        } else {
            raw.cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect()
        };

        let mut values = HashMap::with_capacity(parsed.len());
        for (key, value) in keys.into_iter().zip(parsed) {
            let Some(key) = key else { continue };
            values.entry(normalize_symbol(key)).or_insert(value);
        }

        Ok(Self { table, values })
    }

    pub fn from_pairs<I, S>(table: &'static str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values
                .entry(normalize_symbol(key.as_ref()))
                .or_insert(value);
        }
        Self { table, values }
    }

    pub fn require(&self, symbol: &str) -> Result<f64, GutError> {
        self.values
            .get(&normalize_symbol(symbol))
            .copied()
            .ok_or_else(|| GutError::MissingSymbol {
                table: self.table,
                symbol: symbol.to_string(),
            })
    }

    pub fn get_or(&self, symbol: &str, default: f64) -> f64 {
        self.values
            .get(&normalize_symbol(symbol))
            .copied()
            .unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Parameters ──────────────────────────────────────────────────────────────

/// Kinetic, partition and absorption-efficiency constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub a_avss: f64,
    pub b_avss: f64,
    pub arl_avss: f64,
    pub a_protein: f64,
    pub b_protein: f64,
    pub arl_protein: f64,
    pub a_fat: f64,
    pub b_fat: f64,
    pub arl_fat: f64,
    /// Whole-tract transit ratio
    pub sir: f64,

    /// GI secretion rates (g/d)
    pub gis_carb: f64,
    pub gis_protein: f64,
    pub gis_fat: f64,

    /// Lower-tract residence time (d)
    pub q: f64,
    pub khyd_nsp: f64,
    pub khyd_rs: f64,
    pub khyd_p: f64,
    pub kabs_f: f64,

    /// Biomass share of hydrolysed substrate
    pub fs0_c: f64,
    pub fs0_p: f64,

    pub fa_ac_c: f64,
    pub fa_pr_c: f64,
    pub fa_bu_c: f64,
    pub fa_ac_p: f64,
    pub fa_pr_p: f64,
    pub fa_bu_p: f64,
    pub fa_aro_p: f64,

    /// Absorbed share of acetate, propionate and butyrates
    pub fabs_scfa: f64,
    /// Absorbed share of aromatics
    pub fabs_aro: f64,
}

impl Parameters {
    pub const TABLE: &'static str = "Parameters";

    pub fn from_frame(df: &DataFrame) -> Result<Self, GutError> {
        let table = SymbolTable::from_frame(Self::TABLE, df, input::SYMBOL, input::VALUE)?;
        Self::from_table(&table)
    }

    pub fn from_table(t: &SymbolTable) -> Result<Self, GutError> {
        Ok(Self {
            a_avss: t.require(parameter::A_AVSS)?,
            b_avss: t.require(parameter::B_AVSS)?,
            arl_avss: t.require(parameter::ARL_AVSS)?,
            a_protein: t.require(parameter::A_PROTEIN)?,
            b_protein: t.require(parameter::B_PROTEIN)?,
            arl_protein: t.require(parameter::ARL_PROTEIN)?,
            a_fat: t.require(parameter::A_FAT)?,
            b_fat: t.require(parameter::B_FAT)?,
            arl_fat: t.require(parameter::ARL_FAT)?,
            sir: t.require(parameter::SIR)?,
            gis_carb: t.require(parameter::GIS_CARB)?,
            gis_protein: t.require(parameter::GIS_PROTEIN)?,
            gis_fat: t.require(parameter::GIS_FAT)?,
            q: t.require(parameter::Q)?,
            khyd_nsp: t.require(parameter::KHYD_NSP)?,
            khyd_rs: t.require(parameter::KHYD_RS)?,
            khyd_p: t.require(parameter::KHYD_P)?,
            kabs_f: t.require(parameter::KABS_F)?,
            fs0_c: t.require(parameter::FS0_C)?,
            fs0_p: t.require(parameter::FS0_P)?,
            fa_ac_c: t.require(parameter::FA_AC_C)?,
            fa_pr_c: t.require(parameter::FA_PR_C)?,
            fa_bu_c: t.require(parameter::FA_BU_C)?,
            fa_ac_p: t.require(parameter::FA_AC_P)?,
            fa_pr_p: t.require(parameter::FA_PR_P)?,
            fa_bu_p: t.require(parameter::FA_BU_P)?,
            fa_aro_p: t.require(parameter::FA_ARO_P)?,
            fabs_scfa: t.get_or(parameter::FABS_SCFA, parameter::DEFAULT_FABS_SCFA),
            fabs_aro: t.get_or(parameter::FABS_ARO, parameter::DEFAULT_FABS_ARO),
        })
    }

    /// Every value paired with its symbol, in table order.
    pub fn entries(&self) -> [(&'static str, f64); 29] {
        [
            (parameter::A_AVSS, self.a_avss),
            (parameter::B_AVSS, self.b_avss),
            (parameter::ARL_AVSS, self.arl_avss),
            (parameter::A_PROTEIN, self.a_protein),
            (parameter::B_PROTEIN, self.b_protein),
            (parameter::ARL_PROTEIN, self.arl_protein),
            (parameter::A_FAT, self.a_fat),
            (parameter::B_FAT, self.b_fat),
            (parameter::ARL_FAT, self.arl_fat),
            (parameter::SIR, self.sir),
            (parameter::GIS_CARB, self.gis_carb),
            (parameter::GIS_PROTEIN, self.gis_protein),
            (parameter::GIS_FAT, self.gis_fat),
            (parameter::Q, self.q),
            (parameter::KHYD_NSP, self.khyd_nsp),
            (parameter::KHYD_RS, self.khyd_rs),
            (parameter::KHYD_P, self.khyd_p),
            (parameter::KABS_F, self.kabs_f),
            (parameter::FS0_C, self.fs0_c),
            (parameter::FS0_P, self.fs0_p),
            (parameter::FA_AC_C, self.fa_ac_c),
            (parameter::FA_PR_C, self.fa_pr_c),
            (parameter::FA_BU_C, self.fa_bu_c),
            (parameter::FA_AC_P, self.fa_ac_p),
            (parameter::FA_PR_P, self.fa_pr_p),
            (parameter::FA_BU_P, self.fa_bu_p),
            (parameter::FA_ARO_P, self.fa_aro_p),
            (parameter::FABS_SCFA, self.fabs_scfa),
            (parameter::FABS_ARO, self.fabs_aro),
        ]
    }
}

// ── Diet ────────────────────────────────────────────────────────────────────

/// Daily intake of each raw dietary fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Diet {
    pub nsp: f64,
    pub rs: f64,
    pub avss: f64,
    /// Protein intake
    pub pi: f64,
    /// Fat intake
    pub fi: f64,
    /// Carbohydrate conversion intercept
    pub ci: f64,
}

impl Diet {
    pub const TABLE: &'static str = "Diet";

    pub fn from_frame(df: &DataFrame) -> Result<Self, GutError> {
        let table = SymbolTable::from_frame(Self::TABLE, df, input::SYMBOL, input::VALUE)?;
        Self::from_table(&table)
    }

    pub fn from_table(t: &SymbolTable) -> Result<Self, GutError> {
        Ok(Self {
            nsp: t.require(diet::NSP)?,
            rs: t.require(diet::RS)?,
            avss: t.require(diet::AVSS)?,
            pi: t.require(diet::PI)?,
            fi: t.require(diet::FI)?,
            ci: t.require(diet::CI)?,
        })
    }

    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            (diet::NSP, self.nsp),
            (diet::RS, self.rs),
            (diet::AVSS, self.avss),
            (diet::PI, self.pi),
            (diet::FI, self.fi),
            (diet::CI, self.ci),
        ]
    }
}

// ── Components ──────────────────────────────────────────────────────────────

/// Oxygen-demand conversion data for one macronutrient class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macronutrient {
    pub gcod_per_gram: f64,
    pub enthalpy_of_combustion: f64,
}

impl Macronutrient {
    pub const fn new(gcod_per_gram: f64, enthalpy_of_combustion: f64) -> Self {
        Self {
            gcod_per_gram,
            enthalpy_of_combustion,
        }
    }

    /// Factor turning an intake quantity into gCOD/d.
    pub fn cod_factor(&self) -> f64 {
        self.gcod_per_gram / self.enthalpy_of_combustion
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    pub carbohydrate: Macronutrient,
    pub protein: Macronutrient,
    pub fat: Macronutrient,
}

impl Components {
    pub const TABLE: &'static str = "Components";

    pub fn from_frame(df: &DataFrame) -> Result<Self, GutError> {
        let cod =
            SymbolTable::from_frame(Self::TABLE, df, input::COMPOUND, input::GCOD_PER_GRAM)?;
        let enthalpy = SymbolTable::from_frame(
            Self::TABLE,
            df,
            input::COMPOUND,
            input::ENTHALPY_OF_COMBUSTION,
        )?;

        let row = |name: &str| -> Result<Macronutrient, GutError> {
            Ok(Macronutrient::new(cod.require(name)?, enthalpy.require(name)?))
        };

        Ok(Self {
            carbohydrate: row(compound::CARBOHYDRATE)?,
            protein: row(compound::PROTEIN)?,
            fat: row(compound::FAT)?,
        })
    }

    pub fn entries(&self) -> [(&'static str, Macronutrient); 3] {
        [
            (compound::CARBOHYDRATE, self.carbohydrate),
            (compound::PROTEIN, self.protein),
            (compound::FAT, self.fat),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_ignore_whitespace() {
        let t = SymbolTable::from_pairs("Parameters", [("fa (Ac)_C", 0.5), (" q ", 1.0)]);
        assert_eq!(t.require("fa(Ac)_C").unwrap(), 0.5);
        assert_eq!(t.require("q").unwrap(), 1.0);
    }

    #[test]
    fn missing_symbol_names_table_and_symbol() {
        let t = SymbolTable::from_pairs("Diet", [("NSP", 1.0)]);
        match t.require("CI") {
            Err(GutError::MissingSymbol { table, symbol }) => {
                assert_eq!(table, "Diet");
                assert_eq!(symbol, "CI");
            }
            other => panic!("expected MissingSymbol, got {other:?}"),
        }
    }

    #[test]
    fn string_cells_are_parsed_and_blanks_become_nan() {
        let df = df![
            input::SYMBOL => ["NSP", "RS", "AvSS"],
            input::VALUE => [" 12.5", "", "abc"],
        ]
        .unwrap();
        let t = SymbolTable::from_frame("Diet", &df, input::SYMBOL, input::VALUE).unwrap();
        assert_eq!(t.require("NSP").unwrap(), 12.5);
        assert!(t.require("RS").unwrap().is_nan());
        assert!(t.require("AvSS").unwrap().is_nan());
    }

    #[test]
    fn numeric_value_column_is_accepted() {
        let df = df![
            input::SYMBOL => ["NSP", "NSP"],
            input::VALUE => [3.0, 9.0],
        ]
        .unwrap();
        let t = SymbolTable::from_frame("Diet", &df, input::SYMBOL, input::VALUE).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.require("NSP").unwrap(), 3.0);
    }

    #[test]
    fn missing_value_column_is_reported() {
        let df = df![input::SYMBOL => ["NSP"]].unwrap();
        let err = SymbolTable::from_frame("Diet", &df, input::SYMBOL, input::VALUE).unwrap_err();
        assert!(matches!(err, GutError::MissingColumn(c) if c == "Diet.Value"));
    }

    #[test]
    fn optional_absorption_fractions_fall_back_to_defaults() {
        let t = SymbolTable::from_pairs(
            "Parameters",
            [
                "aAvSS", "bAvSS", "ARL_AvSS", "aprotein", "bprotein", "ARL_protein", "afat",
                "bfat", "ARL_fat", "SIR", "GIS_carb", "GIS_protein", "GIS_fat", "q", "khyd_NSP",
                "khyd_RS", "khyd_P", "kabs_F", "fs0_C", "fs0_P", "fa (Ac)_C", "fa (Pr)_C",
                "fa (Bu)_C", "fa (Ac)_P", "fa (Pr)_P", "fa (Bu)_P", "fa (Aro)_P",
            ]
            .map(|s| (s, 0.1)),
        );
        let p = Parameters::from_table(&t).unwrap();
        assert_eq!(p.fabs_scfa, 0.95);
        assert_eq!(p.fabs_aro, 0.0);
        assert_eq!(p.fa_aro_p, 0.1);
    }

    #[test]
    fn components_read_both_columns() {
        let df = df![
            input::COMPOUND => ["Carbohydrate", "Protein", "Fat"],
            input::GCOD_PER_GRAM => ["1.185", "1.42", "2.87"],
            input::ENTHALPY_OF_COMBUSTION => ["17.3", "23.6", "39.3"],
        ]
        .unwrap();
        let c = Components::from_frame(&df).unwrap();
        assert_eq!(c.protein, Macronutrient::new(1.42, 23.6));
        assert_eq!(c.fat.gcod_per_gram, 2.87);
    }
}
