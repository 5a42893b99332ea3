//! Callable signatures.
//!
//! A [`Signature`] is what the host's decoration layer extracts from a
//! callable: its parameters, in declaration order, and their hints.
//! [`Checker::compile_signature`] turns it into a [`CompiledSignature`],
//! all or nothing: either every hint compiles, or the callable is rejected
//! before it can ever be invoked half-checked.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use vigil_diagnostic::ErrorCode;
use vigil_types::{HintId, Pith};

use crate::engine::{CheckSite, SiteKind};
use crate::{Checker, Validator, VigilError};

/// How a parameter receives its argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamKind {
    /// Positional or keyword.
    Positional,
    /// Keyword only.
    Keyword,
    /// `*args`: the hint applies to every item.
    VarPositional,
    /// `**kwargs`: the hint applies to every value.
    VarKeyword,
}

/// One declared parameter.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    /// `None` when unannotated.
    pub hint: Option<HintId>,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamKind, hint: Option<HintId>) -> Self {
        Param {
            name: name.into(),
            kind,
            hint,
        }
    }

    pub fn positional(name: impl Into<String>, hint: HintId) -> Self {
        Self::new(name, ParamKind::Positional, Some(hint))
    }

    pub fn keyword(name: impl Into<String>, hint: HintId) -> Self {
        Self::new(name, ParamKind::Keyword, Some(hint))
    }

    pub fn var_positional(name: impl Into<String>, hint: HintId) -> Self {
        Self::new(name, ParamKind::VarPositional, Some(hint))
    }

    pub fn var_keyword(name: impl Into<String>, hint: HintId) -> Self {
        Self::new(name, ParamKind::VarKeyword, Some(hint))
    }

    pub fn unannotated(name: impl Into<String>, kind: ParamKind) -> Self {
        Self::new(name, kind, None)
    }
}

/// Declared hints of one callable.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Signature {
    pub callable: String,
    /// Module relative forward references resolve in.
    pub module: Option<String>,
    pub params: Vec<Param>,
    pub ret: Option<HintId>,
    /// The host checks the return hint against the value it obtains after
    /// suspension, not against the immediate return.
    pub suspending: bool,
}

impl Signature {
    pub fn new(callable: impl Into<String>) -> Self {
        Signature {
            callable: callable.into(),
            module: None,
            params: Vec::new(),
            ret: None,
            suspending: false,
        }
    }

    #[must_use]
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn returns(mut self, hint: HintId) -> Self {
        self.ret = Some(hint);
        self
    }

    #[must_use]
    pub fn suspending(mut self) -> Self {
        self.suspending = true;
        self
    }

    /// `module.callable`, or just `callable` outside any module.
    pub fn qualname(&self) -> String {
        match &self.module {
            Some(module) => format!("{module}.{}", self.callable),
            None => self.callable.clone(),
        }
    }

    /// Reject parameter lists no callable could declare.
    fn validate(&self) -> Result<(), VigilError> {
        let mut seen = FxHashSet::default();
        let mut var_positional = 0;
        let mut var_keyword = 0;

        for param in &self.params {
            if param.name == "return" {
                return Err(VigilError::invalid_signature(
                    ErrorCode::V2001,
                    "parameter named `return` clashes with the return hint".to_string(),
                ));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(VigilError::invalid_signature(
                    ErrorCode::V2001,
                    format!("duplicate parameter `{}`", param.name),
                ));
            }
            match param.kind {
                ParamKind::VarPositional => var_positional += 1,
                ParamKind::VarKeyword => var_keyword += 1,
                ParamKind::Positional | ParamKind::Keyword => {}
            }
        }

        if var_positional > 1 || var_keyword > 1 {
            return Err(VigilError::invalid_signature(
                ErrorCode::V2001,
                "more than one variadic parameter of the same kind".to_string(),
            ));
        }
        Ok(())
    }
}

/// The argument bound to one parameter at a call.
#[derive(Copy, Clone, Debug)]
pub enum Bound<'a> {
    Value(&'a Pith),
    /// Items collected by a `*args` parameter.
    Variadic(&'a [Pith]),
    /// Entries collected by a `**kwargs` parameter.
    Keywords(&'a [(String, Pith)]),
    /// Not passed; the default applies and is not checked.
    Default,
}

impl Bound<'_> {
    /// Check if this binding can be passed to a parameter of `kind`.
    fn fits(self, kind: ParamKind) -> bool {
        match self {
            Bound::Value(_) => matches!(kind, ParamKind::Positional | ParamKind::Keyword),
            Bound::Variadic(_) => kind == ParamKind::VarPositional,
            Bound::Keywords(_) => kind == ParamKind::VarKeyword,
            Bound::Default => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Bound::Value(_) => "a single value",
            Bound::Variadic(_) => "collected positional items",
            Bound::Keywords(_) => "collected keyword entries",
            Bound::Default => "a default",
        }
    }
}

struct CompiledParam {
    name: Box<str>,
    kind: ParamKind,
    /// `None` when unannotated or ignorable.
    validator: Option<Validator>,
}

/// A signature whose every hint compiled.
pub struct CompiledSignature {
    qualname: Box<str>,
    params: Box<[CompiledParam]>,
    ret: Option<Validator>,
    suspending: bool,
    checker: Checker,
}

impl CompiledSignature {
    #[tracing::instrument(level = "debug", skip_all, fields(callable = %signature.qualname()))]
    pub(crate) fn compile(checker: &Checker, signature: &Signature) -> Result<Self, VigilError> {
        let qualname = signature.qualname();
        Self::compile_checked(checker, signature, qualname.clone())
            .map_err(|error| error.with_callable(&qualname))
    }

    fn compile_checked(
        checker: &Checker,
        signature: &Signature,
        qualname: String,
    ) -> Result<Self, VigilError> {
        signature.validate()?;
        let module = signature.module.as_deref();
        let compile_hint = |hint: Option<HintId>| -> Result<Option<Validator>, VigilError> {
            match hint {
                Some(hint) if !checker.pool().flags(hint).is_ignorable() => {
                    checker.get_or_compile_in(hint, module).map(Some)
                }
                _ => Ok(None),
            }
        };

        let params = signature
            .params
            .iter()
            .map(|param| {
                Ok(CompiledParam {
                    name: param.name.as_str().into(),
                    kind: param.kind,
                    validator: compile_hint(param.hint)?,
                })
            })
            .collect::<Result<Box<[_]>, VigilError>>()?;
        let ret = compile_hint(signature.ret)?;

        tracing::debug!(
            checked = params.iter().filter(|p| p.validator.is_some()).count(),
            "compiled signature"
        );
        Ok(CompiledSignature {
            qualname: qualname.into_boxed_str(),
            params,
            ret,
            suspending: signature.suspending,
            checker: checker.clone(),
        })
    }

    /// `module.callable`.
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn is_suspending(&self) -> bool {
        self.suspending
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Check if any parameter or the return is actually checked.
    pub fn checks_anything(&self) -> bool {
        self.ret.is_some() || self.params.iter().any(|p| p.validator.is_some())
    }

    /// Check the arguments of one call, one [`Bound`] per declared
    /// parameter in declaration order.
    pub fn check_call(&self, args: &[Bound<'_>]) -> Result<(), VigilError> {
        if args.len() != self.params.len() {
            return Err(VigilError::invalid_signature(
                ErrorCode::V2001,
                format!(
                    "call bound {} arguments to {} parameters",
                    args.len(),
                    self.params.len()
                ),
            )
            .with_callable(&self.qualname));
        }

        for (param, bound) in self.params.iter().zip(args) {
            if !bound.fits(param.kind) {
                return Err(VigilError::invalid_signature(
                    ErrorCode::V2001,
                    format!(
                        "{} bound to {:?} parameter `{}`",
                        bound.describe(),
                        param.kind,
                        param.name
                    ),
                )
                .with_callable(&self.qualname));
            }
        }

        let mut sites: SmallVec<[CheckSite<'_>; 8]> = SmallVec::new();
        for (position, (param, bound)) in self.params.iter().zip(args).enumerate() {
            let Some(validator) = &param.validator else {
                continue;
            };
            let callable = &*self.qualname;
            let name = &*param.name;
            match *bound {
                Bound::Value(pith) => sites.push(CheckSite::new(
                    SiteKind::Parameter {
                        callable,
                        name,
                        position,
                    },
                    pith,
                    validator,
                )),
                Bound::Variadic(items) => {
                    for (index, pith) in items.iter().enumerate() {
                        sites.push(CheckSite::new(
                            SiteKind::VariadicItem {
                                callable,
                                name,
                                index,
                            },
                            pith,
                            validator,
                        ));
                    }
                }
                Bound::Keywords(entries) => {
                    for (key, pith) in entries {
                        sites.push(CheckSite::new(
                            SiteKind::KeywordItem {
                                callable,
                                name,
                                key,
                            },
                            pith,
                            validator,
                        ));
                    }
                }
                Bound::Default => {}
            }
        }
        self.checker.check(&sites)
    }

    /// Check a return value, or for suspending callables the value obtained
    /// after suspension.
    pub fn check_return(&self, value: &Pith) -> Result<(), VigilError> {
        let Some(validator) = &self.ret else {
            return Ok(());
        };
        let site = CheckSite::new(
            SiteKind::Return {
                callable: &self.qualname,
            },
            value,
            validator,
        );
        self.checker.check(&[site])
    }
}
