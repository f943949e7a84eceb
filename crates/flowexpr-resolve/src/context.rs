//! The immutable context threaded through expression resolution.

use crate::error::{FlowExprError, FlowExprResult};
use crate::receiver::Receiver;
use crate::symbol::{MethodSymbol, VariableSymbol};
use crate::types::Type;
use std::sync::Arc;

/// What `this` and `#N` mean while resolving one expression string.
///
/// A context is never mutated. The derivations ([`with_use_local_scope`],
/// [`as_member_of`], [`to_outer_receiver`]) each return a new one.
///
/// [`with_use_local_scope`]: ResolutionContext::with_use_local_scope
/// [`as_member_of`]: ResolutionContext::as_member_of
/// [`to_outer_receiver`]: ResolutionContext::to_outer_receiver
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionContext {
    receiver: Option<Receiver>,
    outer_receiver: Option<Receiver>,
    arguments: Option<Arc<[Receiver]>>,
    parsing_member: bool,
    use_local_scope: bool,
}

impl ResolutionContext {
    /// A root context. `arguments` is `None` when no enclosing method applies.
    pub fn new(receiver: Option<Receiver>, arguments: Option<Vec<Receiver>>) -> Self {
        Self {
            outer_receiver: receiver.clone(),
            receiver,
            arguments: arguments.map(Arc::from),
            parsing_member: false,
            use_local_scope: true,
        }
    }

    /// Context inside the declaration of `method`, a member of `enclosing_type`.
    pub fn for_method_declaration(method: &MethodSymbol, enclosing_type: Type) -> Self {
        let receiver = implicit_receiver(enclosing_type, method.is_static);
        let arguments = method.parameters.iter().cloned().map(Receiver::local).collect();
        Self::new(Some(receiver), Some(arguments))
    }

    /// Context inside a lambda body declared within `enclosing_type`.
    pub fn for_lambda(parameters: &[VariableSymbol], enclosing_type: Type) -> Self {
        let arguments = parameters.iter().cloned().map(Receiver::local).collect();
        Self::new(Some(Receiver::this(enclosing_type)), Some(arguments))
    }

    /// Context at a class declaration: `this` is the class, and there are no parameters.
    pub fn for_class_declaration(class_type: Type) -> Self {
        Self::new(Some(Receiver::this(class_type)), Some(Vec::new()))
    }

    /// Context at a call site with an explicit receiver expression.
    pub fn for_method_use(receiver: Receiver, arguments: Vec<Receiver>) -> Self {
        Self::new(Some(receiver), Some(arguments))
    }

    /// Context at a call site without a receiver expression, e.g. `m(x)`.
    pub fn for_method_use_implicit(method: &MethodSymbol, arguments: Vec<Receiver>) -> Self {
        let receiver = implicit_receiver(method.owner.clone(), method.is_static);
        Self::new(Some(receiver), Some(arguments))
    }

    /// Context at a constructor call `new C(args)`. The new object has no
    /// representation yet, so the receiver is [`Receiver::Unknown`].
    pub fn for_new_class_use(class_type: Type, arguments: Vec<Receiver>) -> Self {
        Self::new(Some(Receiver::Unknown { ty: class_type }), Some(arguments))
    }

    pub fn receiver(&self) -> Option<&Receiver> {
        self.receiver.as_ref()
    }

    pub fn outer_receiver(&self) -> Option<&Receiver> {
        self.outer_receiver.as_ref()
    }

    pub fn arguments(&self) -> Option<&[Receiver]> {
        self.arguments.as_deref()
    }

    pub fn parsing_member(&self) -> bool {
        self.parsing_member
    }

    pub fn use_local_scope(&self) -> bool {
        self.use_local_scope
    }

    pub fn with_use_local_scope(&self, use_local_scope: bool) -> Self {
        Self { use_local_scope, ..self.clone() }
    }

    /// The context for the member part of `receiver.member`.
    pub fn as_member_of(&self, receiver: Receiver) -> Self {
        Self {
            receiver: Some(receiver),
            outer_receiver: self.outer_receiver.clone(),
            arguments: self.arguments.clone(),
            parsing_member: true,
            use_local_scope: self.use_local_scope,
        }
    }

    /// The context for method arguments and array indices, which resolve
    /// against the outer receiver rather than the member chain.
    pub fn to_outer_receiver(&self) -> Self {
        Self {
            receiver: self.outer_receiver.clone(),
            outer_receiver: self.outer_receiver.clone(),
            arguments: self.arguments.clone(),
            parsing_member: false,
            use_local_scope: self.use_local_scope,
        }
    }

    /// The argument written `#index` (1-based).
    pub fn argument(&self, index: usize) -> FlowExprResult<&Receiver> {
        let marker = format!("#{}", index);
        if index == 0 {
            return Err(FlowExprError::parse_error(
                marker,
                "one should use \"this\" for the receiver or \"#1\" for the first formal parameter",
            ));
        }
        let arguments = self
            .arguments
            .as_deref()
            .ok_or_else(|| FlowExprError::parse_error(marker, "no parameter found"))?;
        arguments.get(index - 1).ok_or(FlowExprError::IndexTooBig {
            index,
            count: arguments.len(),
        })
    }
}

/// The receiver an unqualified member reference implicitly has: the class
/// itself for a static member, `this` otherwise.
pub fn implicit_receiver(owner: Type, is_static: bool) -> Receiver {
    if is_static {
        Receiver::class_name(owner)
    } else {
        Receiver::this(owner)
    }
}
