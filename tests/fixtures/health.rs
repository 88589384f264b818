pub struct Pong {
    pub ok: bool,
}

/// Liveness probe.
/// @endpoint /ping
/// @method GET
pub fn ping(ctx: &Service) -> Pong {
    Pong { ok: ctx.is_alive() }
}
