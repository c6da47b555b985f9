//! Product CRUD with image upload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::{ProductId, ProductImageId};

use crate::db::products::{ProductInput, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{Product, ProductImage, set_flash, take_flash};
use crate::services::uploads;
use crate::state::AppState;

// =============================================================================
// Multipart form parsing
// =============================================================================

/// An uploaded file from the form.
struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

/// The parsed product form: scalar fields plus any uploaded images.
struct ProductForm {
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    cpf_limit: Option<i32>,
    is_active: bool,
    remove_image: bool,
    main_image: Option<UploadedFile>,
    gallery: Vec<UploadedFile>,
}

/// Read the multipart product form.
///
/// Checkbox fields arrive only when checked; file fields arrive with an
/// empty body when no file was chosen.
async fn parse_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut name = String::new();
    let mut description = String::new();
    let mut price_raw = String::new();
    let mut stock_raw = String::from("0");
    let mut cpf_limit_raw = String::new();
    let mut is_active = false;
    let mut remove_image = false;
    let mut main_image = None;
    let mut gallery = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Formulário inválido: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = read_text(field).await?,
            "description" => description = read_text(field).await?,
            "price" => price_raw = read_text(field).await?,
            "stock" => stock_raw = read_text(field).await?,
            "cpf_limit" => cpf_limit_raw = read_text(field).await?,
            "is_active" => is_active = true,
            "remove_image" => remove_image = true,
            "image" => {
                if let Some(file) = read_file(field).await? {
                    main_image = Some(file);
                }
            }
            "gallery" => {
                if let Some(file) = read_file(field).await? {
                    gallery.push(file);
                }
            }
            _ => {}
        }
    }

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Informe o nome do produto".to_string()));
    }

    let price = parse_price(&price_raw)?;

    let stock: i32 = stock_raw
        .trim()
        .parse()
        .ok()
        .filter(|s| *s >= 0)
        .ok_or_else(|| AppError::BadRequest("Estoque inválido".to_string()))?;

    let cpf_limit = match cpf_limit_raw.trim() {
        "" => None,
        raw => Some(
            raw.parse::<i32>()
                .ok()
                .filter(|l| *l >= 0)
                .ok_or_else(|| AppError::BadRequest("Limite por CPF inválido".to_string()))?,
        ),
    };

    Ok(ProductForm {
        name,
        description: description.trim().to_string(),
        price,
        stock,
        cpf_limit,
        is_active,
        remove_image,
        main_image,
        gallery,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Formulário inválido: {e}")))
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> Result<Option<UploadedFile>> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Upload inválido: {e}")))?;

    if filename.is_empty() || bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile {
        filename,
        bytes: bytes.to_vec(),
    }))
}

/// Parse a price typed with either decimal separator ("99,90" or "99.90").
fn parse_price(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<Decimal>()
        .ok()
        .filter(|p| *p >= Decimal::ZERO)
        .ok_or_else(|| AppError::BadRequest("Preço inválido".to_string()))
}

// =============================================================================
// Display data
// =============================================================================

/// One row of the product list.
pub struct ProductRowView {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub cpf_limit: Option<i32>,
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            cpf_limit: product.cpf_limit,
            is_active: product.is_active,
            image_url: product.image_url.clone(),
        }
    }
}

/// The edit form's view of a product.
pub struct ProductEditView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i32,
    pub cpf_limit: String,
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductEditView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("{:.2}", product.price),
            stock: product.stock,
            cpf_limit: product.cpf_limit.map(|l| l.to_string()).unwrap_or_default(),
            is_active: product.is_active,
            image_url: product.image_url.clone(),
        }
    }
}

/// A gallery thumbnail on the edit page.
pub struct GalleryImageView {
    pub id: i32,
    pub image_url: String,
}

impl From<&ProductImage> for GalleryImageView {
    fn from(image: &ProductImage) -> Self {
        Self {
            id: image.id.as_i32(),
            image_url: image.image_url.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductRowView>,
    pub flash: Option<String>,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct ProductNewTemplate {
    pub flash: Option<String>,
}

/// Edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub product: ProductEditView,
    pub gallery: Vec<GalleryImageView>,
    pub flash: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Product list, newest first.
#[instrument(skip(_admin, state, session))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductRowView::from).collect(),
        flash: take_flash(&session).await,
    })
}

/// New product form.
#[instrument(skip(_admin, session))]
pub async fn new_page(
    RequireAdminAuth(_admin): RequireAdminAuth,
    session: Session,
) -> ProductNewTemplate {
    ProductNewTemplate {
        flash: take_flash(&session).await,
    }
}

/// Create a product from the multipart form.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form = parse_product_form(multipart).await?;
    let uploads_dir = &state.config().uploads_dir;

    let main_url = match &form.main_image {
        Some(file) => Some(
            uploads::store_image(uploads_dir, &file.filename, &file.bytes)
                .await?
                .url,
        ),
        None => None,
    };

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .create(
            &ProductInput {
                name: &form.name,
                description: &form.description,
                price: form.price,
                stock: form.stock,
                cpf_limit: form.cpf_limit,
                is_active: form.is_active,
            },
            main_url.as_deref(),
        )
        .await?;

    for file in &form.gallery {
        let stored = uploads::store_image(uploads_dir, &file.filename, &file.bytes).await?;
        repo.add_image(product.id, &stored.url).await?;
    }

    tracing::info!(product_id = %product.id, admin_id = %admin.id, "product created");
    set_flash(&session, "Produto criado com sucesso").await;

    Ok(Redirect::to("/products").into_response())
}

/// Edit product form.
#[instrument(skip(_admin, state, session))]
pub async fn edit_page(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<ProductEditTemplate> {
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(id);

    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("produto {id}")))?;
    let gallery = repo.images(id).await?;

    Ok(ProductEditTemplate {
        product: ProductEditView::from(&product),
        gallery: gallery.iter().map(GalleryImageView::from).collect(),
        flash: take_flash(&session).await,
    })
}

/// Update a product from the multipart form.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form = parse_product_form(multipart).await?;
    let uploads_dir = &state.config().uploads_dir;
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(id);

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("produto {id}")))?;

    repo.update(
        id,
        &ProductInput {
            name: &form.name,
            description: &form.description,
            price: form.price,
            stock: form.stock,
            cpf_limit: form.cpf_limit,
            is_active: form.is_active,
        },
    )
    .await?;

    if let Some(file) = &form.main_image {
        let stored = uploads::store_image(uploads_dir, &file.filename, &file.bytes).await?;
        repo.set_image(id, Some(&stored.url)).await?;
        if let Some(old) = &existing.image_url {
            uploads::remove_image(uploads_dir, old).await;
        }
    } else if form.remove_image {
        repo.set_image(id, None).await?;
        if let Some(old) = &existing.image_url {
            uploads::remove_image(uploads_dir, old).await;
        }
    }

    for file in &form.gallery {
        let stored = uploads::store_image(uploads_dir, &file.filename, &file.bytes).await?;
        repo.add_image(id, &stored.url).await?;
    }

    tracing::info!(product_id = %id, admin_id = %admin.id, "product updated");
    set_flash(&session, "Produto atualizado").await;

    Ok(Redirect::to(&format!("/products/{id}/edit")).into_response())
}

/// Delete a product and its stored images.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(id);
    let uploads_dir = &state.config().uploads_dir;

    let Some(product) = repo.get(id).await? else {
        return Ok(Redirect::to("/products").into_response());
    };
    let gallery = repo.images(id).await?;

    match repo.delete(id).await {
        Ok(()) => {
            if let Some(url) = &product.image_url {
                uploads::remove_image(uploads_dir, url).await;
            }
            for image in &gallery {
                uploads::remove_image(uploads_dir, &image.image_url).await;
            }
            tracing::info!(product_id = %id, admin_id = %admin.id, "product deleted");
            set_flash(&session, "Produto excluído").await;
        }
        Err(err) => {
            set_flash(&session, &AppError::Database(err).user_message()).await;
        }
    }

    Ok(Redirect::to("/products").into_response())
}

/// Remove one gallery image.
#[instrument(skip(_admin, state, session))]
pub async fn delete_image(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path((id, image_id)): Path<(i32, i32)>,
    session: Session,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());

    if let Some(url) = repo.delete_image(ProductImageId::new(image_id)).await? {
        uploads::remove_image(&state.config().uploads_dir, &url).await;
        set_flash(&session, "Imagem removida").await;
    }

    Ok(Redirect::to(&format!("/products/{id}/edit")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_accepts_both_separators() {
        assert_eq!(parse_price("99,90").expect("comma"), Decimal::new(9990, 2));
        assert_eq!(parse_price("99.90").expect("dot"), Decimal::new(9990, 2));
        assert_eq!(parse_price(" 70 ").expect("integer"), Decimal::new(70, 0));
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price("abc").is_err());
        assert!(parse_price("-5").is_err());
        assert!(parse_price("").is_err());
    }
}
