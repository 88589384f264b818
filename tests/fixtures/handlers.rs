use crate::service::Service;

pub struct ApiError;

/// Lists items page by page.
/// @endpoint /items
/// @method GET
pub fn list_items(ctx: &Service, req: ListItemsRequest) -> ListItemsResponse {
    ctx.items.list(req.page, req.PageSize)
}

/// Creates an item.
/// @endpoint /items
/// @method POST
pub fn create_item(ctx: &Service, req: CreateItemRequest) -> Result<CreateItemResponse, ApiError> {
    ctx.items.create(req.name, req.price).map_err(|_| ApiError)
}

pub struct ItemsHandler;

impl ItemsHandler {
    /// @endpoint /never
    /// @method GET
    pub fn new() -> Self {
        ItemsHandler
    }
}

#[cfg(test)]
mod tests {
    /// @endpoint /test-only
    /// @method GET
    pub fn hidden(ctx: &Service) {}
}
