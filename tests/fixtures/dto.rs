// Request and response records of the items API.

pub const MAIN_SERVICE_PACKAGE_PATH: &str = "crate::service";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[allow(non_snake_case)]
pub struct Item {
    pub Id: i64,
    pub Name: String,
}

#[allow(non_snake_case)]
pub struct ListItemsRequest {
    pub page: i32,
    pub PageSize: u32,
}

pub struct ListItemsResponse {
    pub items: Vec<Item>,
    pub total: i64,
}

pub struct CreateItemRequest {
    pub name: String,
    pub price: f64,
}

pub struct CreateItemResponse {
    pub id: i64,
}
