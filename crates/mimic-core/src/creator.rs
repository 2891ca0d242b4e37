use mimic_model::{CallExpr, Expr, Method, MimicMode, MissingCallSitePolicy, Param, TypeDef};

use crate::config::CompositionConfig;
use crate::copier;
use crate::error::{MimicError, Result, TransformError};
use crate::matcher;
use crate::report::{CompositionReport, ConstructorOutcome, MethodOutcome};
use crate::splice::{Anchor, Splicer};

const TARGET: &str = "mimic.core";

/// Copies the members of a source type into a destination type.
///
/// Members that do not exist in the destination are copied verbatim. For a
/// constructor or method that collides with a destination member, the source
/// member is cloned under a new name (see [`CompositionConfig::clone_name`])
/// and a call to the clone is spliced into the destination member:
///
/// - constructors always call the clone at every exit;
/// - methods follow the [`MimicMode`] configured for them.
///
/// Fields never collide silently: a field name present on both sides aborts
/// with [`MimicError::DuplicateField`].
///
/// The source is only read. The destination is mutated in place; when an
/// aspect fails, members handled before the failure stay in place.
#[derive(Debug, Clone, Default)]
pub struct MimicCreator {
    config: CompositionConfig,
}

impl MimicCreator {
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    /// Creator with default settings and the given disambiguation key.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self::new(CompositionConfig::new().with_key(key))
    }

    /// Interfaces, then fields, then constructors, then methods.
    pub fn mimic_class(&self, src: &TypeDef, dst: &mut TypeDef) -> Result<CompositionReport> {
        let _span = tracing::debug_span!(
            target: TARGET,
            "mimic_class",
            src = %src.name,
            dst = %dst.name
        )
        .entered();

        let report = CompositionReport {
            interfaces: self.mimic_interfaces(src, dst),
            fields: self.mimic_fields(src, dst)?,
            constructors: self.mimic_constructors(src, dst)?,
            methods: self.mimic_methods(src, dst)?,
        };
        tracing::info!(
            target: TARGET,
            src = %src.name,
            dst = %dst.name,
            members = report.members_added(),
            "type now mimics source"
        );
        Ok(report)
    }

    /// Adds every source interface the destination does not implement yet.
    ///
    /// Returns the interfaces that were added.
    pub fn mimic_interfaces(&self, src: &TypeDef, dst: &mut TypeDef) -> Vec<String> {
        let mut added = Vec::new();
        for interface in &src.interfaces {
            if matcher::has_interface(dst, interface) {
                continue;
            }
            copier::copy_interface(dst, interface);
            tracing::debug!(target: TARGET, %interface, "added interface");
            added.push(interface.clone());
        }
        added
    }

    /// Copies every source field.
    ///
    /// All names are checked before anything is copied, so a collision leaves
    /// the destination's fields untouched.
    pub fn mimic_fields(&self, src: &TypeDef, dst: &mut TypeDef) -> Result<Vec<String>> {
        if let Some(field) = src
            .fields
            .iter()
            .find(|field| matcher::colliding_field(dst, field).is_some())
        {
            return Err(MimicError::DuplicateField {
                type_name: dst.name.clone(),
                field: field.name.clone(),
            });
        }

        let mut copied = Vec::with_capacity(src.fields.len());
        for field in &src.fields {
            copier::copy_field(dst, field);
            tracing::debug!(target: TARGET, field = %field.name, "copied field");
            copied.push(field.name.clone());
        }
        Ok(copied)
    }

    pub fn mimic_constructors(
        &self,
        src: &TypeDef,
        dst: &mut TypeDef,
    ) -> Result<Vec<ConstructorOutcome>> {
        let mut outcomes = Vec::with_capacity(src.constructors.len());
        for ctor in &src.constructors {
            let signature = ctor.signature();
            let Some(idx) = matcher::colliding_constructor(dst, ctor) else {
                copier::copy_constructor(dst, ctor);
                tracing::debug!(target: TARGET, %signature, "copied constructor");
                outcomes.push(ConstructorOutcome::Copied(signature));
                continue;
            };

            let clone_name = self.config.clone_name(src.simple_name());
            let clone = copier::constructor_as_method(ctor, clone_name.clone());
            ensure_clone_slot(dst, &clone)?;

            let target = &dst.constructors[idx];
            let invocation = invocation(&clone_name, &target.params);
            let spliced = Splicer::at_exits(invocation)
                .splice(&target.body)
                .map_err(|source| transform_error(dst, "<init>", source))?;

            dst.constructors[idx].body = spliced.body;
            dst.methods.push(clone);
            tracing::debug!(
                target: TARGET,
                %signature,
                clone = %clone_name,
                "chained colliding constructor"
            );
            outcomes.push(ConstructorOutcome::Chained {
                signature,
                clone: clone_name,
            });
        }
        Ok(outcomes)
    }

    pub fn mimic_methods(&self, src: &TypeDef, dst: &mut TypeDef) -> Result<Vec<MethodOutcome>> {
        let mut outcomes = Vec::with_capacity(src.methods.len());
        for method in &src.methods {
            let outcome = match matcher::colliding_method(dst, method) {
                None => {
                    copier::copy_method(dst, method);
                    tracing::debug!(target: TARGET, method = %method.signature(), "copied method");
                    MethodOutcome::Copied(method.signature())
                }
                Some(idx) => self.splice_method(src, dst, method, idx)?,
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn splice_method(
        &self,
        src: &TypeDef,
        dst: &mut TypeDef,
        method: &Method,
        idx: usize,
    ) -> Result<MethodOutcome> {
        let signature = method.signature();
        let (mode, insertion_point) = self.config.effective_mode(&method.name);
        let clone_name = self.config.clone_name(&method.name);

        let clone = copier::clone_method(method, clone_name.clone())
            .map_err(|source| transform_error(src, &method.name, source))?;
        ensure_clone_slot(dst, &clone)?;

        let anchor = match mode {
            MimicMode::BeforeSuper | MimicMode::AfterSuper | MimicMode::ReplaceSuper => {
                Some(Anchor::SuperCall(method.name.as_str()))
            }
            MimicMode::Before | MimicMode::After => Some(Anchor::NamedCall(
                resolve_insertion_point(dst, &method.name, insertion_point)?,
            )),
            MimicMode::AtBeginning | MimicMode::BeforeReturn => None,
        };

        let target = &dst.methods[idx];
        let body = target
            .body
            .as_ref()
            .ok_or_else(|| transform_error(dst, &target.name, TransformError::MissingBody))?;
        // The clone's result can only stand in for the destination's when both return one.
        let replace_value = method.returns_value() && target.returns_value();
        let spliced = Splicer::for_mode(
            mode,
            invocation(&clone_name, &target.params),
            anchor,
            replace_value,
        )
        .and_then(|splicer| splicer.splice(body))
        .map_err(|source| transform_error(dst, &method.name, source))?;

        if mode.requires_call_site() && spliced.sites == 0 {
            let anchor = anchor.map(|a| a.to_string()).unwrap_or_default();
            match self.config.missing_call_site() {
                MissingCallSitePolicy::Fail => {
                    return Err(MimicError::MissingCallSite {
                        type_name: dst.name.clone(),
                        method: method.name.clone(),
                        mode,
                        anchor,
                    });
                }
                MissingCallSitePolicy::Skip => {
                    tracing::warn!(
                        target: TARGET,
                        dst = %dst.name,
                        method = %signature,
                        %mode,
                        %anchor,
                        near_misses = spliced.near_misses,
                        "no call site to splice at; clone added but body left unchanged"
                    );
                    dst.methods.push(clone);
                    return Ok(MethodOutcome::ClonedOnly {
                        signature,
                        clone: clone_name,
                        mode,
                    });
                }
            }
        }

        dst.methods[idx].body = Some(spliced.body);
        dst.methods.push(clone);
        tracing::debug!(
            target: TARGET,
            method = %signature,
            clone = %clone_name,
            %mode,
            sites = spliced.sites,
            "spliced colliding method"
        );
        Ok(MethodOutcome::Spliced {
            signature,
            clone: clone_name,
            mode,
            sites: spliced.sites,
        })
    }
}

/// Forwards the enclosing member's parameters, in order, to the clone.
fn invocation(clone_name: &str, params: &[Param]) -> CallExpr {
    CallExpr::this(
        clone_name,
        params.iter().map(|p| Expr::Local(p.name.clone())).collect(),
    )
}

fn ensure_clone_slot(dst: &TypeDef, clone: &Method) -> Result<()> {
    let signature = clone.signature();
    if dst.method(&signature).is_some() {
        return Err(MimicError::CloneConflict {
            type_name: dst.name.clone(),
            signature: signature.to_string(),
        });
    }
    Ok(())
}

fn resolve_insertion_point<'a>(
    dst: &TypeDef,
    method: &str,
    configured: Option<&'a str>,
) -> Result<&'a str> {
    let Some(name) = configured else {
        return Err(MimicError::MemberNotResolvable {
            type_name: dst.name.clone(),
            description: format!("an insertion point for `{method}` (none configured)"),
        });
    };
    match dst.resolve_method_name(name) {
        Some(origin) => {
            tracing::trace!(target: TARGET, insertion_point = name, ?origin, "resolved insertion point");
            Ok(name)
        }
        None => Err(MimicError::MemberNotResolvable {
            type_name: dst.name.clone(),
            description: format!("insertion point `{name}` for `{method}`"),
        }),
    }
}

fn transform_error(ty: &TypeDef, member: &str, source: TransformError) -> MimicError {
    MimicError::UnderlyingTransform {
        type_name: ty.name.clone(),
        member: member.to_string(),
        source,
    }
}
