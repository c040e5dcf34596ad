mod fc_net;

pub use fc_net::FCNet;
