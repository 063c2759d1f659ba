//! Built-in demo benchmark, opened when no document is given on the command line.

use super::{Benchmark, Profile};
use crate::error::Result;
use crate::models::{TextSet, ValueType, DEFAULT_LANGUAGE};

fn en(text: &str) -> TextSet {
    TextSet::single(DEFAULT_LANGUAGE, text)
}

/// Small benchmark with nested groups, rules of both default selections and
/// one Value of each declared type.
pub fn demo_benchmark() -> Result<Benchmark> {
    let mut b = Benchmark::new("xccdf_org.example_benchmark_demo", en("Demo Security Guide"));
    b.set_description(
        "xccdf_org.example_benchmark_demo",
        en("Example benchmark used to try out tailoring."),
    )?;

    b.add_value(
        "xccdf_org.example_benchmark_demo",
        "var_password_min_len",
        en("Minimum password length"),
        ValueType::Number,
    )?;
    b.add_instance("var_password_min_len", None, "12")?;
    b.add_instance("var_password_min_len", Some("strict"), "15")?;

    b.add_group("xccdf_org.example_benchmark_demo", "grp_system", en("System Settings"))?;
    b.add_value("grp_system", "var_banner_text", en("Login banner text"), ValueType::String)?;
    b.add_instance("var_banner_text", None, "Authorized uses only.")?;
    b.add_rule("grp_system", "rule_banner_enabled", en("Enable login banner"))?;

    b.add_group("grp_system", "grp_ssh", en("SSH Server"))?;
    b.add_value("grp_ssh", "var_ssh_root_login", en("Permit root login"), ValueType::Boolean)?;
    b.add_instance("var_ssh_root_login", None, "no")?;
    b.add_instance("var_ssh_root_login", Some("legacy"), "yes")?;
    b.add_rule("grp_ssh", "rule_ssh_disable_root", en("Disable SSH root login"))?;
    b.add_rule("grp_ssh", "rule_ssh_idle_timeout", en("Set SSH idle timeout"))?;
    b.set_default_selected("rule_ssh_idle_timeout", false)?;

    b.add_group("grp_ssh", "grp_ssh_crypto", en("SSH Cryptography"))?;
    b.add_rule("grp_ssh_crypto", "rule_ssh_strong_ciphers", en("Use strong ciphers"))?;

    b.add_group("xccdf_org.example_benchmark_demo", "grp_services", en("Services"))?;
    b.add_rule("grp_services", "rule_disable_telnet", en("Disable telnet"))?;
    b.add_rule("grp_services", "rule_disable_rsh", en("Disable rsh"))?;
    b.set_default_selected("grp_services", false)?;

    Ok(b)
}

/// Profile the demo opens with.
pub fn demo_profile() -> Profile {
    Profile::new(
        "xccdf_org.example_profile_default",
        en("Default Profile"),
        en("Profile tailored from the demo benchmark."),
    )
}
