//! OpenAPI fragment for the catalog routes

use serde_json::{json, Value};

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "array", "items": items })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(schema_ref("ErrorResponse"))
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book ID",
        "schema": { "type": "integer" }
    })
}

fn book_list(summary: &str) -> Value {
    json!({
        "get": {
            "summary": summary,
            "tags": ["Books"],
            "responses": {
                "200": {
                    "description": "List of books",
                    "content": json_content(array_of(schema_ref("Book")))
                },
                "500": error_response("Internal server error")
            }
        }
    })
}

fn book_schema() -> Value {
    let string = json!({ "type": "string" });
    let integer = json!({ "type": "integer" });
    let number = json!({ "type": "number" });
    let timestamp = json!({ "type": "string", "format": "date-time" });

    json!({
        "type": "object",
        "properties": {
            "id": integer,
            "title": string,
            "author": string,
            "isbn": string,
            "year": integer,
            "price": number,
            "category": string,
            "original_price": { "type": "number", "description": "Present only when discounted" },
            "discount": { "type": "integer", "description": "Discount percentage" },
            "cover_image": string,
            "rating": number,
            "reviews_count": integer,
            "is_new": { "type": "boolean" },
            "pages": integer,
            "language": string,
            "publisher": string,
            "description": string,
            "created_at": timestamp,
            "updated_at": timestamp
        },
        "required": ["id", "title", "author"]
    })
}

pub fn fragment() -> Value {
    let book_body = json!({
        "required": true,
        "content": json_content(schema_ref("BookInput"))
    });

    let mut input_schema = book_schema();
    if let Some(properties) = input_schema["properties"].as_object_mut() {
        for generated in ["id", "created_at", "updated_at"] {
            properties.remove(generated);
        }
    }
    input_schema["required"] = json!([]);

    json!({
        "paths": {
            "/books": {
                "get": book_list("Get all books")["get"],
                "post": {
                    "summary": "Create a new book",
                    "tags": ["Books"],
                    "requestBody": book_body,
                    "responses": {
                        "201": {
                            "description": "Created book",
                            "content": json_content(schema_ref("Book"))
                        },
                        "400": error_response("Invalid body"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/{id}": {
                "get": {
                    "summary": "Get book by ID",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Book",
                            "content": json_content(schema_ref("Book"))
                        },
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": "Update an existing book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": book_body,
                    "responses": {
                        "200": {
                            "description": "Updated book",
                            "content": json_content(schema_ref("Book"))
                        },
                        "400": error_response("Invalid body"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Deletion confirmation",
                            "content": json_content(json!({
                                "type": "object",
                                "properties": { "message": { "type": "string" } }
                            }))
                        },
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/search": {
                "get": {
                    "summary": "Search books by keyword in title, author or description",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "q",
                        "in": "query",
                        "required": true,
                        "description": "Search keyword",
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": {
                            "description": "Matching books",
                            "content": json_content(array_of(schema_ref("Book")))
                        },
                        "400": error_response("Missing search query"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/featured": book_list("Get featured books (highly rated or many reviews)"),
            "/books/new": book_list("Get recently added books"),
            "/books/discounted": book_list("Get discounted books"),
            "/categories": {
                "get": {
                    "summary": "Get distinct list of book categories",
                    "tags": ["Categories"],
                    "responses": {
                        "200": {
                            "description": "Categories",
                            "content": json_content(array_of(json!({ "type": "string" })))
                        },
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": book_schema(),
                "BookInput": input_schema
            }
        }
    })
}
