pub mod mock_stages;
