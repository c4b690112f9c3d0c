//! Product resolution for design requests.
//!
//! Design requests are often created before a matching catalog product
//! exists, and order creation must never block on missing catalog data. The
//! resolver therefore walks a fixed, ordered chain of strategies and the
//! first one to produce a product wins. Only an entirely empty catalog is a
//! hard failure.

use tracing::{debug, instrument, warn};

use crate::domain::{DesignRequest, Product};
use crate::error::{EngineError, EngineResult};
use crate::store::CommerceStore;

/// One link in the fallback chain, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Product id embedded in the request's apparel selection.
    SelectedProduct,
    /// Product whose slug equals the request's `product_slug`.
    SlugMatch,
    /// Product linked to the request's design, recommended entries first,
    /// ties broken by association insertion order.
    DesignAssociation,
    /// Any product associated with the request's sport.
    SportAssociation,
    /// Any product in the catalog. Guarantees progress over price accuracy.
    AnyProduct,
}

impl ResolutionStrategy {
    pub const CHAIN: [ResolutionStrategy; 5] = [
        ResolutionStrategy::SelectedProduct,
        ResolutionStrategy::SlugMatch,
        ResolutionStrategy::DesignAssociation,
        ResolutionStrategy::SportAssociation,
        ResolutionStrategy::AnyProduct,
    ];
}

/// A resolved product together with the strategy that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedProduct {
    pub product: Product,
    pub strategy: ResolutionStrategy,
}

pub struct ProductResolver<'a, S: CommerceStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CommerceStore + ?Sized> ProductResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        ProductResolver { store }
    }

    /// Walks the chain in order; first `Some` wins.
    #[instrument(skip(self, request), fields(design_request_id = %request.id))]
    pub async fn resolve(&self, request: &DesignRequest) -> EngineResult<ResolvedProduct> {
        for strategy in ResolutionStrategy::CHAIN {
            if let Some(product) = self.try_strategy(strategy, request).await? {
                debug!(?strategy, product_id = %product.id, "product resolved");
                return Ok(ResolvedProduct { product, strategy });
            }
        }
        warn!("catalog is empty, no product available for pricing");
        Err(EngineError::NoProductAvailable)
    }

    /// Evaluates a single strategy. Public so each link of the chain can be
    /// exercised in isolation.
    pub async fn try_strategy(
        &self,
        strategy: ResolutionStrategy,
        request: &DesignRequest,
    ) -> EngineResult<Option<Product>> {
        match strategy {
            ResolutionStrategy::SelectedProduct => self.by_selected_product(request).await,
            ResolutionStrategy::SlugMatch => self.by_slug(request).await,
            ResolutionStrategy::DesignAssociation => self.by_design(request).await,
            ResolutionStrategy::SportAssociation => self.by_sport(request).await,
            ResolutionStrategy::AnyProduct => self.store.any_product().await,
        }
    }

    async fn by_selected_product(&self, request: &DesignRequest) -> EngineResult<Option<Product>> {
        let Some(product_id) = request.selected_apparel.as_ref().and_then(|s| s.product_id) else {
            return Ok(None);
        };
        self.store.product(product_id).await
    }

    async fn by_slug(&self, request: &DesignRequest) -> EngineResult<Option<Product>> {
        let Some(slug) = request.product_slug.as_deref() else {
            return Ok(None);
        };
        self.store.product_by_slug(slug).await
    }

    async fn by_design(&self, request: &DesignRequest) -> EngineResult<Option<Product>> {
        let Some(design_id) = request.design_id else {
            return Ok(None);
        };
        let links = self.store.products_for_design(design_id).await?;
        let chosen = links
            .iter()
            .find(|link| link.recommended)
            .or_else(|| links.first());
        Ok(chosen.map(|link| link.product.clone()))
    }

    async fn by_sport(&self, request: &DesignRequest) -> EngineResult<Option<Product>> {
        let Some(sport_slug) = request.sport_slug.as_deref() else {
            return Ok(None);
        };
        // A sport slug with no catalog entry is not fatal here; the chain
        // still has the any-product fallback after this.
        let Some(sport_id) = self.store.sport_id_by_slug(sport_slug).await? else {
            debug!(sport_slug, "unknown sport slug, falling through");
            return Ok(None);
        };
        let products = self.store.products_for_sport(sport_id).await?;
        Ok(products.into_iter().next())
    }
}
