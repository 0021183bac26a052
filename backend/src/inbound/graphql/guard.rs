//! Authentication plus policy checks run at the top of guarded resolvers.

use async_graphql::Context;
use uuid::Uuid;

use super::context::caller;
use super::error::graphql_error;
use crate::domain::{AuthenticatedUser, Error, PolicyHandler, Reach, authorize};

/// Resolver guard pairing a caller with one policy handler.
///
/// Resolvers call [`PolicyGuard::check`] with the records they are about to
/// touch, so ownership rules can see the target id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyGuard(PolicyHandler);

impl PolicyGuard {
    pub const fn new(handler: PolicyHandler) -> Self {
        Self(handler)
    }

    /// Authorise the caller for `reach`, returning who they are.
    pub fn check<'a>(
        self,
        ctx: &Context<'a>,
        reach: Reach,
    ) -> async_graphql::Result<&'a AuthenticatedUser> {
        let user = caller(ctx);
        authorize(user, self.0, reach).map_err(graphql_error)?;
        user.ok_or_else(|| graphql_error(Error::unauthorized("Unauthorized")))
    }

    /// Authorise an operation on the caller's own record.
    pub fn check_own<'a>(self, ctx: &Context<'a>) -> async_graphql::Result<&'a AuthenticatedUser> {
        let user = caller(ctx).ok_or_else(|| graphql_error(Error::unauthorized("Unauthorized")))?;
        self.check(ctx, Reach::Owned(user.id))
    }

    /// Authorise an operation on the record named by a raw client id.
    ///
    /// Anonymous and unprivileged callers are rejected before the id is
    /// parsed; ownership rules are then checked against the parsed id.
    pub fn check_record<'a, I>(
        self,
        ctx: &Context<'a>,
        raw: &str,
        parse: fn(&str) -> Result<I, Error>,
    ) -> async_graphql::Result<(&'a AuthenticatedUser, I)>
    where
        I: Copy + Into<Uuid>,
    {
        self.check(ctx, Reach::Some)?;
        let id = parse(raw).map_err(graphql_error)?;
        let user = self.check(ctx, Reach::Owned(id.into()))?;
        Ok((user, id))
    }
}
