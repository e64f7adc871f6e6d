//! `status roadmap` command handler.
//!
//! Governance/spec-introspection tooling lives outside this core (spec.md
//! §1); this is the minimal passthrough notice SPEC_FULL.md §6.1 calls for.

use crate::ui;

pub fn roadmap() {
    ui::print_info("roadmap introspection is provided by an external collaborator tool");
}
