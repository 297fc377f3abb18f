use crate::error::AppError;
use crate::pagination::{Page, PageParams};
use crate::products::{
    dto::{CreateProductRequest, ProductQuery, UpdateProductRequest},
    repo_types::{Category, NewProduct, ProductChanges, ProductFilter},
};

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_category(raw: &str) -> Result<Category, AppError> {
    raw.parse::<Category>()
        .map_err(|_| AppError::bad_request(format!("Invalid category: {}", raw.trim())))
}

fn check_price(price: f64) -> Result<f64, AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::bad_request("Price must be greater than zero"));
    }
    Ok(price)
}

fn check_stock(stock: i32) -> Result<i32, AppError> {
    if stock < 0 {
        return Err(AppError::bad_request("Stock cannot be negative"));
    }
    Ok(stock)
}

pub fn filter_from_query(q: &ProductQuery) -> Result<(ProductFilter, Page), AppError> {
    let category = match q.category.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(parse_category(raw)?),
    };
    let filter = ProductFilter {
        search: non_blank(q.search.clone()),
        category,
        featured: q.featured,
    };
    let page = Page::from_params(&PageParams {
        page: q.page,
        limit: q.limit,
    });
    Ok((filter, page))
}

fn missing_fields() -> AppError {
    AppError::bad_request("Missing required fields")
}

pub fn validate_new(req: CreateProductRequest) -> Result<NewProduct, AppError> {
    let (Some(name), Some(description), Some(price), Some(image), Some(category)) = (
        non_blank(req.name),
        non_blank(req.description),
        req.price.filter(|p| !p.is_blank()),
        non_blank(req.image),
        non_blank(req.category),
    ) else {
        return Err(missing_fields());
    };
    let price = price.to_f64().ok_or_else(missing_fields)?;
    let stock = match req.stock.filter(|s| !s.is_blank()) {
        Some(s) => s.to_i32().ok_or_else(missing_fields)?,
        None => 0,
    };

    Ok(NewProduct {
        name,
        description,
        price: check_price(price)?,
        image,
        category: parse_category(&category)?,
        stock: check_stock(stock)?,
        featured: req.featured.unwrap_or(false),
    })
}

pub fn validate_changes(req: UpdateProductRequest) -> Result<ProductChanges, AppError> {
    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&req.name) || blank(&req.description) || blank(&req.image) {
        return Err(AppError::bad_request("Fields cannot be empty"));
    }

    let price = match req.price.filter(|p| !p.is_blank()) {
        Some(p) => {
            let v = p
                .to_f64()
                .ok_or_else(|| AppError::bad_request("Invalid price"))?;
            Some(check_price(v)?)
        }
        None => None,
    };

    Ok(ProductChanges {
        name: non_blank(req.name),
        description: non_blank(req.description),
        price,
        image: non_blank(req.image),
        category: non_blank(req.category)
            .map(|c| parse_category(&c))
            .transpose()?,
        featured: req.featured,
    })
}
