//! Whole-unit resolution: every plan, then the checks that need all of them

use crate::builder::{PlanBuilder, PlanResult};
use crate::plan::BindingPlan;
use ferry_check::{
    BindingShape, ConsistencyChecker, ExplicitBinding, PlanLookup, check_duplicate_names,
};
use ferry_resolve::ResolveOptions;
use ferry_symbols::{Diagnostic, MemberId, Severity, SymbolModel};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// One compilation unit over an immutable symbol model
pub struct CompilationUnit<'a> {
    model: &'a SymbolModel,
    options: &'a ResolveOptions,
    builder: PlanBuilder<'a>,
}

/// Everything a unit produced
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub assembly: String,
    pub version: u64,
    plans: BTreeMap<MemberId, Arc<BindingPlan>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CompilationUnit<'a> {
    pub fn new(model: &'a SymbolModel, options: &'a ResolveOptions) -> Self {
        Self {
            model,
            options,
            builder: PlanBuilder::new(model, options),
        }
    }

    pub fn builder(&self) -> &PlanBuilder<'a> {
        &self.builder
    }

    pub fn invalidate(&mut self) {
        self.builder.invalidate();
    }

    pub fn compile(&self) -> UnitReport {
        let start = Instant::now();

        // collect() is the barrier: the checks below see every plan
        let results: Vec<(MemberId, PlanResult)> = self
            .model
            .members()
            .par_iter()
            .map(|m| (m.id, self.builder.build_plan(m.id)))
            .collect();

        let mut report = UnitReport {
            assembly: self.model.assembly.name.clone(),
            version: self.builder.version(),
            plans: BTreeMap::new(),
            diagnostics: Vec::new(),
        };
        for (id, result) in results {
            match result {
                Ok(plan) => {
                    report.plans.insert(id, plan);
                }
                Err(error) => report.diagnostics.push(Diagnostic::error(error)),
            }
        }

        let violations = ConsistencyChecker::new(self.model, &report)
            .check()
            .err()
            .unwrap_or_default();
        let mut checked: Vec<Diagnostic> = violations
            .into_iter()
            .map(|v| Diagnostic::error(v.into_error(self.model)))
            .collect();
        checked.extend(check_duplicate_names(self.model, &report, self.options));
        report.diagnostics.extend(checked);

        report
            .diagnostics
            .sort_by_cached_key(|d| (d.error.member().id, d.error.code(), d.to_string()));

        info!(
            assembly = %report.assembly,
            plans = report.plans.len(),
            errors = report.count(Severity::Error),
            warnings = report.count(Severity::Warning),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "compiled unit"
        );
        report
    }
}

/// Build every plan of `model` and run the unit-wide checks
pub fn compile_unit(model: &SymbolModel, options: &ResolveOptions) -> UnitReport {
    CompilationUnit::new(model, options).compile()
}

impl UnitReport {
    pub fn plan(&self, id: MemberId) -> Option<&Arc<BindingPlan>> {
        self.plans.get(&id)
    }

    pub fn plans(&self) -> impl Iterator<Item = (MemberId, &Arc<BindingPlan>)> {
        self.plans.iter().map(|(id, plan)| (*id, plan))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn pretty_print(&self, model: &SymbolModel) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Binding Plans: {} (v{}) ===\n\n", self.assembly, self.version));

        for ty in model.types() {
            let members = model.members_of(ty.id);
            if members.is_empty() {
                continue;
            }
            out.push_str(&format!("--- {} ---\n", ty.full_name()));
            for &id in members {
                let Some(member) = model.member(id) else {
                    continue;
                };
                let label = match member.kind.accessor_kind() {
                    ferry_symbols::AccessorKind::None => member.name.clone(),
                    kind => format!("{}.{}", member.name, kind),
                };
                match self.plans.get(&id) {
                    Some(plan) => out.push_str(&format!("  {} -> {}\n", label, plan)),
                    None => out.push_str(&format!("  {} -> <error>\n", label)),
                }
            }
            out.push('\n');
        }

        if !self.diagnostics.is_empty() {
            out.push_str("--- Diagnostics ---\n");
            for diagnostic in &self.diagnostics {
                out.push_str(&format!("  {}\n", diagnostic));
            }
        }

        out
    }
}

impl PlanLookup for UnitReport {
    fn shape(&self, member: MemberId) -> Option<BindingShape> {
        self.plans.get(&member).map(|p| p.shape())
    }

    fn explicit_binding(&self, member: MemberId) -> Option<ExplicitBinding> {
        self.plans.get(&member).and_then(|p| p.explicit_binding())
    }
}
