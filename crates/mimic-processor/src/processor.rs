use mimic_config::{MimicConfig, MimicDirective};
use mimic_core::{CompositionReport, MimicCreator};
use mimic_model::TypeDef;

use crate::error::ProcessError;
use crate::pool::TypePool;

const TARGET: &str = "mimic.processor";

/// Outcome of one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReport {
    pub target: String,
    pub source: String,
    /// Aspects switched off by the directive stay empty.
    pub composition: CompositionReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub types: Vec<TypeReport>,
}

impl ProcessReport {
    #[must_use]
    pub fn members_added(&self) -> usize {
        self.types
            .iter()
            .map(|report| report.composition.members_added())
            .sum()
    }
}

/// Runs every `[[mimic]]` directive of a config against a [`TypePool`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MimicProcessor;

impl MimicProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Validates `config`, then applies its directives in order.
    ///
    /// Each destination is composed on a copy and written back to the pool
    /// only when its directive succeeds. The first failing directive aborts
    /// the run; destinations processed before it stay written back.
    pub fn process(
        &self,
        pool: &mut impl TypePool,
        config: &MimicConfig,
    ) -> Result<ProcessReport, ProcessError> {
        let validation = config.validate();
        if !validation.errors.is_empty() {
            return Err(ProcessError::Config(validation.errors));
        }
        for warning in &validation.warnings {
            tracing::warn!(target: TARGET, %warning, "config warning");
        }

        let mut report = ProcessReport::default();
        for directive in &config.mimic {
            report.types.push(self.process_directive(pool, directive)?);
        }
        tracing::info!(
            target: TARGET,
            types = report.types.len(),
            members = report.members_added(),
            "processed mimic directives"
        );
        Ok(report)
    }

    /// Makes `directive.target` mimic `directive.source`.
    pub fn process_directive(
        &self,
        pool: &mut impl TypePool,
        directive: &MimicDirective,
    ) -> Result<TypeReport, ProcessError> {
        let _span = tracing::debug_span!(
            target: TARGET,
            "process_directive",
            target_type = %directive.target,
            source_type = %directive.source
        )
        .entered();

        let src = pool
            .get(&directive.source)
            .ok_or_else(|| ProcessError::UnknownType {
                name: directive.source.clone(),
            })?;
        let mut dst: TypeDef = pool
            .get(&directive.target)
            .cloned()
            .ok_or_else(|| ProcessError::UnknownType {
                name: directive.target.clone(),
            })?;
        if let Some(inherited) = pool.inherited_members(&dst.name) {
            dst.inherited = inherited;
        }

        let composition = compose(directive, src, &mut dst).map_err(|source| {
            ProcessError::Mimic {
                target: directive.target.clone(),
                source_type: directive.source.clone(),
                source,
            }
        })?;

        pool.insert(dst);
        Ok(TypeReport {
            target: directive.target.clone(),
            source: directive.source.clone(),
            composition,
        })
    }
}

/// Runs the aspects the directive enables, in the fixed engine order.
fn compose(
    directive: &MimicDirective,
    src: &TypeDef,
    dst: &mut TypeDef,
) -> mimic_core::Result<CompositionReport> {
    let creator = MimicCreator::new(directive.composition_config());
    let all = directive.mimic_interfaces
        && directive.mimic_fields
        && directive.mimic_constructors
        && directive.mimic_methods;
    if all {
        return creator.mimic_class(src, dst);
    }

    let mut report = CompositionReport::default();
    if directive.mimic_interfaces {
        report.interfaces = creator.mimic_interfaces(src, dst);
    }
    if directive.mimic_fields {
        report.fields = creator.mimic_fields(src, dst)?;
    }
    if directive.mimic_constructors {
        report.constructors = creator.mimic_constructors(src, dst)?;
    }
    if directive.mimic_methods {
        report.methods = creator.mimic_methods(src, dst)?;
    }
    tracing::debug!(
        target: TARGET,
        dst = %dst.name,
        members = report.members_added(),
        "composed selected aspects"
    );
    Ok(report)
}
