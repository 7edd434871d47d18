//! The provider and data-source lifecycle traits.
//!
//! A host drives a provider through a fixed sequence: declare schemas,
//! configure the provider once per session, then serve lookup requests. The
//! traits here capture that contract without binding to any specific host
//! runtime; the configured state is passed explicitly rather than held in
//! globals.

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;
use async_trait::async_trait;

/// A configurable provider of data sources.
#[async_trait]
pub trait Provider {
    /// Declarative configuration model accepted by [`configure`](Self::configure).
    type Config;
    /// Shared state handed to data sources after a successful configure.
    type Data;

    /// Stable type name of the provider.
    fn type_name(&self) -> &'static str;

    /// Declare the provider's configuration schema.
    fn schema(&self) -> Schema;

    /// Validate the configuration and construct the shared session state.
    ///
    /// Every validation problem is reported through `diagnostics`; `None` is
    /// returned whenever an error-severity diagnostic was recorded, in which
    /// case no lookups can be served for the session.
    async fn configure(
        &self,
        config: Self::Config,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self::Data>;
}

/// A read-only data source served by a configured provider.
#[async_trait]
pub trait DataSource {
    /// Shared provider state consumed by reads.
    type ProviderData;
    /// Filter model narrowing the lookup.
    type Filter;
    /// Result model produced by a successful read.
    type State;

    /// Stable type name of the data source.
    fn type_name(&self) -> &'static str;

    /// Declare the data source's input and output schema.
    fn schema(&self) -> Schema;

    /// Perform one lookup.
    ///
    /// Problems are reported through `diagnostics`; `None` is returned when
    /// the lookup could not produce a result.
    async fn read(
        &self,
        data: &Self::ProviderData,
        filter: Option<Self::Filter>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self::State>;
}
