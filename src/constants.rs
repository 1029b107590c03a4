// Constants for the SubC front end

/// Name of the implicit program routine that owns every top-level declaration
pub const DUMMY_PROGRAM_NAME: &str = "dummyprogramname";

/// Prefix for procedures whose name is missing or already taken
/// Followed by a three-digit counter, e.g. `dummyprocedurename_001`
pub const DUMMY_PROCEDURE_PREFIX: &str = "dummyprocedurename_";

/// Prefix for functions whose name is missing or already taken
pub const DUMMY_FUNCTION_PREFIX: &str = "dummyfunctionname_";

/// Function that becomes the program's entry point
pub const MAIN_ROUTINE_NAME: &str = "main";
