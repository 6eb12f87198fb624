/// Named-port signal block.
///
/// A block is wired into a host by name: the host writes values into the
/// block's recognized input ports, asks the block to update, and reads
/// derived values back from its output ports. The host does not know the
/// block's internals; the port names are its entire interface.
///
/// Port name matching is exact. No trimming, no case folding, no prefix
/// matches. A write to an unknown port is ignored and a read from an
/// unknown port yields `0.0`, so a miswired host degrades to a no-op
/// rather than a fault.
pub trait Block {
    /// Recognized input port names.
    fn inputs() -> &'static [&'static str]
    where
        Self: Sized;

    /// Recognized output port names.
    fn outputs() -> &'static [&'static str]
    where
        Self: Sized;

    /// Write a value to the named input port.
    ///
    /// Unknown port names and non-finite values are ignored; the previous
    /// value is retained.
    fn set_input(&mut self, key: &str, value: f64);

    /// Read the current value of the named output port.
    ///
    /// Unknown port names read as `0.0`.
    fn output(&self, key: &str) -> f64;

    /// Derive the output ports from the current input ports.
    ///
    /// Updates are explicit. Writing an input port never recomputes the
    /// outputs by itself; stale outputs remain readable until the host
    /// calls this method.
    fn update(&mut self);
}
