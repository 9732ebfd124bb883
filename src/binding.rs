//! Type-variable binding and unification
//!
//! A [`BindingContext`] is created fresh for every guarded call. It holds the
//! call-scope bindings directly and reaches instance-scope bindings through a
//! shared [`InstanceBindings`] side table keyed by receiver identity. Call
//! scope is discarded when the context is dropped; instance scope lives as
//! long as the receiver (release it with [`InstanceBindings::forget`]).
//!
//! Unification follows a widen/narrow rule: the first observed value binds
//! the variable, a strictly narrower candidate rebinds it, a wider candidate
//! passes without rebinding, and anything else fails the check.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::{GenericInstance, InstanceId, TypeId, TypeRegistry, TypeVarId};

// ============================================================================
// INSTANCE-SCOPE SIDE TABLE
// ============================================================================

/// Instance-scope bindings for all live generic receivers.
///
/// The table is keyed by [`InstanceId`], so it never keeps a receiver alive.
/// Concurrent calls on the same receiver serialize on the internal lock for
/// the read/modify/write of that receiver's map.
#[derive(Debug, Default)]
pub struct InstanceBindings {
    table: Mutex<HashMap<InstanceId, HashMap<TypeVarId, TypeId>>>,
}

impl InstanceBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, id: InstanceId, var: TypeVarId) -> Option<TypeId> {
        self.table.lock().get(&id).and_then(|m| m.get(&var)).copied()
    }

    fn set(&self, id: InstanceId, var: TypeVarId, ty: TypeId) {
        self.table.lock().entry(id).or_default().insert(var, ty);
    }

    /// Runs one unification step against a receiver's binding of `var`,
    /// holding the lock across the whole read/modify/write.
    ///
    /// `decide` maps the current binding to `Some((effective, rebind))` on
    /// success or `None` on failure; the effective type is stored only when
    /// `rebind` is true, so a failing step never creates or alters an entry.
    fn unify<F>(&self, id: InstanceId, var: TypeVarId, decide: F) -> bool
    where
        F: FnOnce(Option<TypeId>) -> Option<(TypeId, bool)>,
    {
        let mut table = self.table.lock();
        let current = table.get(&id).and_then(|m| m.get(&var)).copied();
        match decide(current) {
            Some((effective, true)) => {
                table.entry(id).or_default().insert(var, effective);
                true
            }
            Some((_, false)) => true,
            None => false,
        }
    }

    /// Drops all bindings attached to a receiver.
    ///
    /// Call this when the receiver's lifetime ends; entries are created
    /// lazily on first bind, so a receiver that never bound anything has
    /// nothing to forget.
    pub fn forget(&self, instance: GenericInstance) {
        self.table.lock().remove(&instance.id);
    }
}

// ============================================================================
// BINDING CONTEXT
// ============================================================================

/// Per-call namespace of type-variable bindings.
pub struct BindingContext<'a> {
    types: &'a TypeRegistry,
    call: HashMap<TypeVarId, TypeId>,
    receiver: Option<GenericInstance>,
    instances: Option<&'a InstanceBindings>,
}

impl<'a> BindingContext<'a> {
    /// A fresh context with no receiver: every binding is call-scoped.
    #[must_use]
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self {
            types,
            call: HashMap::new(),
            receiver: None,
            instances: None,
        }
    }

    /// A fresh context linked to a generic receiver, exposing its
    /// instance-scope map through the shared side table.
    #[must_use]
    pub fn for_receiver(
        types: &'a TypeRegistry,
        receiver: GenericInstance,
        instances: &'a InstanceBindings,
    ) -> Self {
        Self {
            types,
            call: HashMap::new(),
            receiver: Some(receiver),
            instances: Some(instances),
        }
    }

    /// The type registry this context resolves against.
    #[must_use]
    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    /// True if `var` is one of the generic parameters of the receiver's
    /// declared type, i.e. binds in instance scope rather than call scope.
    #[must_use]
    pub fn is_generic_in(&self, var: TypeVarId) -> bool {
        self.receiver
            .is_some_and(|r| self.types.params_of(r.ty).contains(&var))
    }

    /// Stores a binding in the scope `var` belongs to.
    pub fn bind(&mut self, var: TypeVarId, ty: TypeId) {
        if self.is_generic_in(var)
            && let (Some(receiver), Some(instances)) = (self.receiver, self.instances)
        {
            instances.set(receiver.id, var, ty);
        } else {
            self.call.insert(var, ty);
        }
    }

    /// Currently bound type of `var`, if any. Call scope wins over instance
    /// scope.
    #[must_use]
    pub fn binding_of(&self, var: TypeVarId) -> Option<TypeId> {
        self.call.get(&var).copied().or_else(|| {
            match (self.receiver, self.instances) {
                (Some(receiver), Some(instances)) => instances.get(receiver.id, var),
                _ => None,
            }
        })
    }

    /// Unifies `var` with `candidate`; the step behind every type-variable
    /// check.
    ///
    /// An unbound variable binds to the candidate. A bound variable accepts a
    /// strictly narrower candidate by rebinding (the first-observed instance
    /// may have picked a too-narrow type, and the binding stays at the most
    /// useful, narrowest type), accepts a wider candidate without rebinding,
    /// and rejects an unrelated one. The effective binding must also obey the
    /// variable's declared bound and constraint set; those are verified
    /// before a new binding is committed, so a failing check never leaves a
    /// violating binding behind in a shared instance scope.
    pub fn is_compatible(&mut self, var: TypeVarId, candidate: TypeId) -> bool {
        if self.is_generic_in(var)
            && let (Some(receiver), Some(instances)) = (self.receiver, self.instances)
        {
            // Instance scope is shared across threads: the read and the
            // conditional rebind must happen under one lock, or two racing
            // first-binds could both observe "unbound" and commit
            // incompatible types.
            return instances.unify(receiver.id, var, |current| {
                self.decide(var, current, candidate)
            });
        }
        let current = self.call.get(&var).copied();
        match self.decide(var, current, candidate) {
            Some((effective, true)) => {
                self.call.insert(var, effective);
                true
            }
            Some((_, false)) => true,
            None => false,
        }
    }

    /// The unification rule over one observed binding: `Some((effective,
    /// rebind))` on success, `None` on failure. Bound and constraints are
    /// verified before the caller commits anything.
    fn decide(
        &self,
        var: TypeVarId,
        current: Option<TypeId>,
        candidate: TypeId,
    ) -> Option<(TypeId, bool)> {
        let (effective, rebind) = match current {
            None => (candidate, true),
            Some(current) if current == candidate => (current, false),
            Some(current) if self.types.is_subtype(candidate, current) => (candidate, true),
            Some(current) if self.types.is_subtype(current, candidate) => (current, false),
            Some(_) => return None,
        };
        if !self.obeys_bound(var, effective) || !self.obeys_constraints(var, effective) {
            return None;
        }
        Some((effective, rebind))
    }

    fn obeys_bound(&self, var: TypeVarId, ty: TypeId) -> bool {
        match self.types.var_bound(var) {
            Some(bound) => self.types.is_subtype(ty, bound),
            None => true,
        }
    }

    fn obeys_constraints(&self, var: TypeVarId, ty: TypeId) -> bool {
        let constraints = self.types.var_constraints(var);
        constraints.is_empty() || constraints.iter().any(|c| self.types.is_subtype(ty, *c))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> (TypeRegistry, TypeId, TypeId, TypeId) {
        // object <- animal <- dog <- pug
        let mut reg = TypeRegistry::new();
        let object = reg.builtins().object;
        let animal = reg.register("animal", object);
        let dog = reg.register("dog", animal);
        let pug = reg.register("pug", dog);
        (reg, animal, dog, pug)
    }

    #[test]
    fn first_use_binds() {
        let (mut reg, _, dog, _) = lattice();
        let x = reg.typevar("X");
        let mut ctx = BindingContext::new(&reg);
        assert_eq!(ctx.binding_of(x), None);
        assert!(ctx.is_compatible(x, dog));
        assert_eq!(ctx.binding_of(x), Some(dog));
    }

    #[test]
    fn narrower_candidate_rebinds() {
        let (mut reg, animal, _, pug) = lattice();
        let x = reg.typevar("X");
        let mut ctx = BindingContext::new(&reg);
        assert!(ctx.is_compatible(x, animal));
        assert!(ctx.is_compatible(x, pug));
        assert_eq!(ctx.binding_of(x), Some(pug));
    }

    #[test]
    fn wider_candidate_keeps_the_narrow_binding() {
        let (mut reg, animal, _, pug) = lattice();
        let x = reg.typevar("X");
        let mut ctx = BindingContext::new(&reg);
        assert!(ctx.is_compatible(x, pug));
        assert!(ctx.is_compatible(x, animal));
        assert_eq!(ctx.binding_of(x), Some(pug));
    }

    #[test]
    fn unrelated_candidate_fails_without_rebinding() {
        let (mut reg, _, dog, _) = lattice();
        let int = reg.builtins().int;
        let x = reg.typevar("X");
        let mut ctx = BindingContext::new(&reg);
        assert!(ctx.is_compatible(x, dog));
        assert!(!ctx.is_compatible(x, int));
        assert_eq!(ctx.binding_of(x), Some(dog));
    }

    #[test]
    fn bound_is_enforced_before_committing() {
        let (mut reg, animal, dog, _) = lattice();
        let int = reg.builtins().int;
        let x = reg.typevar_with_bound("X", animal);
        let mut ctx = BindingContext::new(&reg);
        assert!(!ctx.is_compatible(x, int));
        assert_eq!(ctx.binding_of(x), None);
        assert!(ctx.is_compatible(x, dog));
    }

    #[test]
    fn constraint_set_is_a_union() {
        let (mut reg, _, dog, _) = lattice();
        let b = *reg.builtins();
        let x = reg.typevar_with_constraints("X", vec![b.int, b.str_]);
        let mut ctx = BindingContext::new(&reg);
        assert!(ctx.is_compatible(x, b.int));
        let mut ctx2 = BindingContext::new(&reg);
        assert!(!ctx2.is_compatible(x, dog));
        assert_eq!(ctx2.binding_of(x), None);
    }

    #[test]
    fn receiver_parameters_bind_in_instance_scope() {
        let mut reg = TypeRegistry::new();
        let b = *reg.builtins();
        let x = reg.typevar("X");
        let y = reg.typevar("Y");
        let stack = reg.register_generic("stack", b.object, vec![x]);
        let instance = reg.new_instance(stack);
        let instances = InstanceBindings::new();

        let mut ctx = BindingContext::for_receiver(&reg, instance, &instances);
        assert!(ctx.is_generic_in(x));
        assert!(!ctx.is_generic_in(y));
        assert!(ctx.is_compatible(x, b.int));
        assert!(ctx.is_compatible(y, b.str_));
        drop(ctx);

        // Instance scope survives the call; call scope does not.
        let next = BindingContext::for_receiver(&reg, instance, &instances);
        assert_eq!(next.binding_of(x), Some(b.int));
        assert_eq!(next.binding_of(y), None);
    }

    #[test]
    fn racing_first_binds_commit_exactly_one_type() {
        let mut reg = TypeRegistry::new();
        let bt = *reg.builtins();
        let x = reg.typevar("X");
        let stack = reg.register_generic("stack", bt.object, vec![x]);
        let instances = InstanceBindings::new();

        for _ in 0..200 {
            let instance = reg.new_instance(stack);
            let barrier = std::sync::Barrier::new(2);
            let (ok_int, ok_str) = std::thread::scope(|s| {
                let first = s.spawn(|| {
                    let mut ctx = BindingContext::for_receiver(&reg, instance, &instances);
                    barrier.wait();
                    ctx.is_compatible(x, bt.int)
                });
                let second = s.spawn(|| {
                    let mut ctx = BindingContext::for_receiver(&reg, instance, &instances);
                    barrier.wait();
                    ctx.is_compatible(x, bt.str_)
                });
                (first.join().unwrap(), second.join().unwrap())
            });

            // Unrelated types: whichever bind lands first wins, the other
            // must fail. Both succeeding means the read and the write were
            // not one atomic step.
            assert!(
                ok_int ^ ok_str,
                "incompatible first-binds must not both succeed"
            );
            let bound = BindingContext::for_receiver(&reg, instance, &instances).binding_of(x);
            assert_eq!(bound, Some(if ok_int { bt.int } else { bt.str_ }));
        }
    }

    #[test]
    fn forget_releases_instance_scope() {
        let mut reg = TypeRegistry::new();
        let b = *reg.builtins();
        let x = reg.typevar("X");
        let stack = reg.register_generic("stack", b.object, vec![x]);
        let instance = reg.new_instance(stack);
        let instances = InstanceBindings::new();

        let mut ctx = BindingContext::for_receiver(&reg, instance, &instances);
        assert!(ctx.is_compatible(x, b.int));
        drop(ctx);
        instances.forget(instance);

        let next = BindingContext::for_receiver(&reg, instance, &instances);
        assert_eq!(next.binding_of(x), None);
    }
}
