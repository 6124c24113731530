//! Application state: the wired services and the operation surface over them

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::{AppConfig, CredentialSource, StorageBackend};
use crate::domain::{
    Cache, Cart, CartRepository, CredentialStore, DomainError, NewProduct, Product, ProductId,
    ProductRepository, UserId, UserIdentity, UserRepository,
};
use crate::infrastructure::auth::{
    IdentityGuard, IssuedToken, JwtConfig, JwtGenerator, JwtService, Principal, TokenIssuer,
};
use crate::infrastructure::cache::CacheFactory;
use crate::infrastructure::cart::{CartAssembler, InMemoryCartRepository, PostgresCartRepository};
use crate::infrastructure::credentials::{StaticCredentialStore, UserCredentialStore};
use crate::infrastructure::product::{InMemoryProductRepository, MongoProductRepository};
use crate::infrastructure::user::{
    Argon2Hasher, CachedUserRepository, CreateUserRequest, InMemoryUserRepository,
    PasswordHasher, PostgresUserRepository, UpdateUserRequest, UserService,
};

/// Username of the account provisioned from `auth.admin_password`
pub const ADMIN_USERNAME: &str = "admin";

/// Shared services behind every storefront operation.
///
/// `issue_token` and `create_user` are open; every other operation takes the
/// raw `Authorization` header value and runs the identity guard first.
#[derive(Debug, Clone)]
pub struct AppState {
    guard: Arc<IdentityGuard>,
    issuer: Arc<TokenIssuer>,
    users: Arc<UserService>,
    products: Arc<dyn ProductRepository>,
    carts: Arc<CartAssembler>,
}

/// Repositories and cache a state is assembled from
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    /// Wire the services over the given stores
    pub fn new(config: &AppConfig, stores: Stores) -> Result<Self, DomainError> {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
        let jwt: Arc<dyn JwtGenerator> = Arc::new(JwtService::new(JwtConfig::new(
            config.auth.jwt_secret.clone(),
            config.auth.token_ttl_minutes,
        )));

        let cached_users: Arc<dyn UserRepository> = Arc::new(CachedUserRepository::with_ttl(
            stores.users.clone(),
            stores.cache,
            Duration::from_secs(config.cache.user_ttl_secs),
        ));

        if config.auth.uses_default_secret() {
            tracing::warn!("auth.jwt_secret is the built-in default; tokens can be forged");
        }

        // Token checks read the system of record, never the cache.
        let (guard, credentials): (IdentityGuard, Arc<dyn CredentialStore>) =
            match config.auth.credential_source {
                CredentialSource::Users => (
                    IdentityGuard::new(jwt.clone(), stores.users.clone()),
                    Arc::new(UserCredentialStore::new(stores.users)),
                ),
                CredentialSource::Static => {
                    let password = config.auth.admin_password.as_deref().ok_or_else(|| {
                        DomainError::configuration(
                            "auth.admin_password is required for the static credential source",
                        )
                    })?;
                    let store: Arc<dyn CredentialStore> =
                        Arc::new(StaticCredentialStore::with_admin(hasher.as_ref(), password)?);
                    (IdentityGuard::with_credentials(jwt.clone(), store.clone()), store)
                }
            };

        let issuer = TokenIssuer::new(
            credentials,
            hasher.clone(),
            jwt,
            chrono::Duration::minutes(config.auth.login_token_ttl_minutes),
        )?;

        Ok(Self {
            guard: Arc::new(guard),
            issuer: Arc::new(issuer),
            users: Arc::new(UserService::new(cached_users, hasher)),
            products: stores.products.clone(),
            carts: Arc::new(CartAssembler::new(stores.carts, stores.products)),
        })
    }

    /// State over process-local stores and an in-process cache
    pub async fn in_memory(config: &AppConfig) -> anyhow::Result<Self> {
        let stores = Stores {
            users: Arc::new(InMemoryUserRepository::new()),
            products: Arc::new(InMemoryProductRepository::new()),
            carts: Arc::new(InMemoryCartRepository::new()),
            cache: CacheFactory::new().create_in_memory(&config.cache),
        };

        let state = Self::new(config, stores)?;
        state.ensure_admin_user(config).await?;
        Ok(state)
    }

    /// State for the configured storage backend, connecting to external stores as needed
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        if config.storage.backend == StorageBackend::InMemory {
            info!("Storage backend: in_memory");
            return Self::in_memory(config).await;
        }

        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
        info!("PostgreSQL connection established");

        info!("Connecting to MongoDB...");
        let products = MongoProductRepository::connect(
            &config.document_store.uri,
            &config.document_store.database,
            &config.document_store.products_collection,
        )
        .await?;
        products.ensure_indexes().await?;
        info!(database = %config.document_store.database, "MongoDB connection established");

        let cache = CacheFactory::new().create(&config.cache).await?;
        info!(backend = %config.cache.backend, "Cache ready");

        let stores = Stores {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            products: Arc::new(products),
            carts: Arc::new(PostgresCartRepository::new(pool)),
            cache,
        };

        let state = Self::new(config, stores)?;
        state.ensure_admin_user(config).await?;
        Ok(state)
    }

    /// Register the `admin` user when a password is configured and the user is missing.
    /// The static credential source holds `admin` itself, so no record is created.
    async fn ensure_admin_user(&self, config: &AppConfig) -> Result<(), DomainError> {
        if config.auth.credential_source == CredentialSource::Static {
            return Ok(());
        }

        let Some(password) = config.auth.admin_password.clone() else {
            return Ok(());
        };

        let request = CreateUserRequest {
            username: ADMIN_USERNAME.to_string(),
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            password,
            email: "admin@ozon.com".to_string(),
        };

        match self.users.create(request).await {
            Ok(_) => {
                info!(username = ADMIN_USERNAME, "Initial admin user created");
                Ok(())
            }
            Err(DomainError::AlreadyExists { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn authorize(&self, authorization: Option<&str>) -> Result<Principal, DomainError> {
        self.guard.authenticate(authorization).await
    }

    pub async fn issue_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, DomainError> {
        report("issue_token", self.issuer.issue(username, password).await)
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserIdentity, DomainError> {
        report("create_user", self.users.create(request).await)
    }

    pub async fn get_user_by_name(
        &self,
        authorization: Option<&str>,
        username: &str,
    ) -> Result<UserIdentity, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            self.users.get_by_username(username).await
        }
        .await;

        report("get_user_by_name", result)
    }

    pub async fn search_users(
        &self,
        authorization: Option<&str>,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<UserIdentity>, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            self.users.search(first_name, last_name).await
        }
        .await;

        report("search_users", result)
    }

    pub async fn update_user(
        &self,
        authorization: Option<&str>,
        user_id: UserId,
        request: UpdateUserRequest,
    ) -> Result<UserIdentity, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            self.users.update(user_id, request).await
        }
        .await;

        report("update_user", result)
    }

    pub async fn add_cart_item(
        &self,
        authorization: Option<&str>,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            self.carts.add_item(user_id, product_id, quantity).await
        }
        .await;

        report("add_cart_item", result)
    }

    pub async fn get_cart(
        &self,
        authorization: Option<&str>,
        user_id: UserId,
    ) -> Result<Cart, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            self.carts.get_cart(user_id).await
        }
        .await;

        report("get_cart", result)
    }

    pub async fn create_product(
        &self,
        authorization: Option<&str>,
        product: NewProduct,
    ) -> Result<Product, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            product.validate()?;
            self.products.create(product).await
        }
        .await;

        report("create_product", result)
    }

    pub async fn get_product(
        &self,
        authorization: Option<&str>,
        product_id: ProductId,
    ) -> Result<Product, DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            self.products
                .get(product_id)
                .await?
                .ok_or_else(|| DomainError::not_found(format!("Product '{}' not found", product_id)))
        }
        .await;

        report("get_product", result)
    }

    /// Remove a product from the catalog. Cart lines pointing at it are left dangling.
    pub async fn delete_product(
        &self,
        authorization: Option<&str>,
        product_id: ProductId,
    ) -> Result<(), DomainError> {
        let result = async {
            self.authorize(authorization).await?;
            if self.products.delete(product_id).await? {
                Ok(())
            } else {
                Err(DomainError::not_found(format!("Product '{}' not found", product_id)))
            }
        }
        .await;

        report("delete_product", result)
    }
}

/// Log infrastructure failures with their detail before they reach a caller
fn report<T>(operation: &'static str, result: Result<T, DomainError>) -> Result<T, DomainError> {
    if let Err(e) = &result {
        if e.is_infrastructure() {
            tracing::error!(operation, kind = %e.kind(), error = %e, "Operation failed");
        } else {
            tracing::debug!(operation, kind = %e.kind(), "Operation rejected");
        }
    }
    result
}
