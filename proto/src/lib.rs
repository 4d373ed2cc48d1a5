//! Generated protobuf and gRPC types for the Monster Slayer services.

tonic::include_proto!("monster_slayer");
