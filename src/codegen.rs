//! The fixed runtime symbol contract (spec §6): the set of `extern`
//! helpers the code generator's C output depends on. Lowering a typed
//! AST to C text is an external collaborator's job (spec §1); this
//! module only emits the symbol names and C signatures the generated
//! header must declare, the one concrete artifact the evidence
//! repository's `expected_output.c` carries into this crate.

use std::fmt::Write as _;

/// One extern the code generator's output references, paired with the
/// C declaration `emit_externs` renders for it.
struct RuntimeSymbol {
    name: &'static str,
    signature: &'static str,
}

macro_rules! rt_symbols {
    ($($name:literal => $sig:literal),+ $(,)?) => {
        &[$(RuntimeSymbol { name: $name, signature: $sig }),+]
    };
}

/// Renaming any of these is a breaking change (spec §6).
const SYMBOLS: &[RuntimeSymbol] = rt_symbols! {
    "rt_str_concat" => "char *rt_str_concat(const char *a, const char *b)",

    "rt_print_long" => "void rt_print_long(long v)",
    "rt_print_double" => "void rt_print_double(double v)",
    "rt_print_char" => "void rt_print_char(char v)",
    "rt_print_string" => "void rt_print_string(const char *v)",
    "rt_print_bool" => "void rt_print_bool(int v)",

    "rt_add_long" => "long rt_add_long(long a, long b)",
    "rt_sub_long" => "long rt_sub_long(long a, long b)",
    "rt_mul_long" => "long rt_mul_long(long a, long b)",
    "rt_div_long" => "long rt_div_long(long a, long b)",
    "rt_mod_long" => "long rt_mod_long(long a, long b)",

    "rt_eq_long" => "int rt_eq_long(long a, long b)",
    "rt_ne_long" => "int rt_ne_long(long a, long b)",
    "rt_lt_long" => "int rt_lt_long(long a, long b)",
    "rt_le_long" => "int rt_le_long(long a, long b)",
    "rt_gt_long" => "int rt_gt_long(long a, long b)",
    "rt_ge_long" => "int rt_ge_long(long a, long b)",

    "rt_add_double" => "double rt_add_double(double a, double b)",
    "rt_sub_double" => "double rt_sub_double(double a, double b)",
    "rt_mul_double" => "double rt_mul_double(double a, double b)",
    "rt_div_double" => "double rt_div_double(double a, double b)",

    "rt_eq_double" => "int rt_eq_double(double a, double b)",
    "rt_ne_double" => "int rt_ne_double(double a, double b)",
    "rt_lt_double" => "int rt_lt_double(double a, double b)",
    "rt_le_double" => "int rt_le_double(double a, double b)",
    "rt_gt_double" => "int rt_gt_double(double a, double b)",
    "rt_ge_double" => "int rt_ge_double(double a, double b)",

    "rt_neg_long" => "long rt_neg_long(long v)",
    "rt_neg_double" => "double rt_neg_double(double v)",
    "rt_not_bool" => "int rt_not_bool(int v)",

    "rt_post_inc_long" => "long rt_post_inc_long(long *slot)",
    "rt_post_dec_long" => "long rt_post_dec_long(long *slot)",

    "rt_to_string_long" => "char *rt_to_string_long(long v)",
    "rt_to_string_double" => "char *rt_to_string_double(double v)",
    "rt_to_string_char" => "char *rt_to_string_char(char v)",
    "rt_to_string_bool" => "char *rt_to_string_bool(int v)",
    "rt_to_string_string" => "char *rt_to_string_string(const char *v)",

    "rt_eq_string" => "int rt_eq_string(const char *a, const char *b)",
    "rt_ne_string" => "int rt_ne_string(const char *a, const char *b)",
    "rt_lt_string" => "int rt_lt_string(const char *a, const char *b)",
    "rt_le_string" => "int rt_le_string(const char *a, const char *b)",
    "rt_gt_string" => "int rt_gt_string(const char *a, const char *b)",
    "rt_ge_string" => "int rt_ge_string(const char *a, const char *b)",

    "rt_free_string" => "void rt_free_string(char *v)",
};

/// Bare symbol names, in declaration order. Kept separate from
/// [`SYMBOLS`] so callers that only need the name set (e.g. a linker
/// symbol check) don't have to parse C signatures out of it.
pub const RUNTIME_SYMBOLS: &[&str] = &[
    "rt_str_concat",
    "rt_print_long",
    "rt_print_double",
    "rt_print_char",
    "rt_print_string",
    "rt_print_bool",
    "rt_add_long",
    "rt_sub_long",
    "rt_mul_long",
    "rt_div_long",
    "rt_mod_long",
    "rt_eq_long",
    "rt_ne_long",
    "rt_lt_long",
    "rt_le_long",
    "rt_gt_long",
    "rt_ge_long",
    "rt_add_double",
    "rt_sub_double",
    "rt_mul_double",
    "rt_div_double",
    "rt_eq_double",
    "rt_ne_double",
    "rt_lt_double",
    "rt_le_double",
    "rt_gt_double",
    "rt_ge_double",
    "rt_neg_long",
    "rt_neg_double",
    "rt_not_bool",
    "rt_post_inc_long",
    "rt_post_dec_long",
    "rt_to_string_long",
    "rt_to_string_double",
    "rt_to_string_char",
    "rt_to_string_bool",
    "rt_to_string_string",
    "rt_eq_string",
    "rt_ne_string",
    "rt_lt_string",
    "rt_le_string",
    "rt_gt_string",
    "rt_ge_string",
    "rt_free_string",
];

/// Renders the `extern` declaration block a generated C translation
/// unit needs at its top, one `extern` per runtime symbol.
pub fn emit_externs() -> String {
    let mut out = String::with_capacity(SYMBOLS.len() * 48);
    for sym in SYMBOLS {
        let _ = writeln!(out, "extern {};", sym.signature);
    }
    out
}

/// Looks up the declared C signature for a runtime symbol, if any.
pub fn signature_of(name: &str) -> Option<&'static str> {
    SYMBOLS.iter().find(|s| s.name == name).map(|s| s.signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_symbols_matches_the_declared_contract_count() {
        assert_eq!(RUNTIME_SYMBOLS.len(), SYMBOLS.len());
        for name in RUNTIME_SYMBOLS {
            assert!(signature_of(name).is_some(), "missing signature for {name}");
        }
    }

    #[test]
    fn emit_externs_renders_one_line_per_symbol() {
        let text = emit_externs();
        assert_eq!(text.lines().count(), RUNTIME_SYMBOLS.len());
        assert!(text.contains("extern void rt_print_long(long v);"));
        assert!(text.contains("extern char *rt_str_concat(const char *a, const char *b);"));
    }

    #[test]
    fn unknown_symbol_has_no_signature() {
        assert_eq!(signature_of("rt_does_not_exist"), None);
    }
}
