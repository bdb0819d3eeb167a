pub struct SetpointArgs {
    pub value: u16,
}
