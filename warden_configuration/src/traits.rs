/// Infallible conversion of an unresolved configuration table into its resolved version.
pub(crate) trait Resolve {
    type Resolved;

    fn resolve(self) -> Self::Resolved;
}


/// Fallible conversion of an unresolved configuration table into its resolved version.
pub(crate) trait TryResolve {
    type Resolved;
    type Error;

    fn try_resolve(self) -> Result<Self::Resolved, Self::Error>;
}


pub(crate) trait TryResolveWithContext {
    type Resolved;
    type Context;
    type Error;

    fn try_resolve_with_context(
        self,
        context: Self::Context,
    ) -> Result<Self::Resolved, Self::Error>;
}
